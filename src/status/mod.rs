/*!
 * gpg status protocol decoding
 *
 * With `--status-fd` gpg writes machine-readable lines of the form
 * `[GNUPG:] KEYWORD payload...` onto the chosen descriptor, interleaved with
 * its ordinary human-readable diagnostics. This module turns that stream
 * into an ordered [`StatusLog`] and drops everything else.
 */

use std::fmt;

use serde::{Deserialize, Serialize};


/// Literal prefix of every status line
pub const STATUS_MARKER: &str = "[GNUPG:]";

/// Status keywords the key-management operations act on.
///
/// Anything else is kept verbatim in [`StatusKeyword::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKeyword {
    KeyCreated,
    KeyNotCreated,
    KeyConsidered,
    ImportOk,
    ImportProblem,
    ImportRes,
    Imported,
    NeedPassphrase,
    GoodPassphrase,
    BadPassphrase,
    MissingPassphrase,
    GetHidden,
    GetLine,
    Failure,
    Error,
    Other(String),
}

impl StatusKeyword {
    /// Map a protocol token to its keyword
    pub fn from_token(token: &str) -> Self {
        match token {
            "KEY_CREATED" => StatusKeyword::KeyCreated,
            "KEY_NOT_CREATED" => StatusKeyword::KeyNotCreated,
            "KEY_CONSIDERED" => StatusKeyword::KeyConsidered,
            "IMPORT_OK" => StatusKeyword::ImportOk,
            "IMPORT_PROBLEM" => StatusKeyword::ImportProblem,
            "IMPORT_RES" => StatusKeyword::ImportRes,
            "IMPORTED" => StatusKeyword::Imported,
            "NEED_PASSPHRASE" => StatusKeyword::NeedPassphrase,
            "GOOD_PASSPHRASE" => StatusKeyword::GoodPassphrase,
            "BAD_PASSPHRASE" => StatusKeyword::BadPassphrase,
            "MISSING_PASSPHRASE" => StatusKeyword::MissingPassphrase,
            "GET_HIDDEN" => StatusKeyword::GetHidden,
            "GET_LINE" => StatusKeyword::GetLine,
            "FAILURE" => StatusKeyword::Failure,
            "ERROR" => StatusKeyword::Error,
            other => StatusKeyword::Other(other.to_string()),
        }
    }

    /// The token as it appears on the wire
    pub fn as_token(&self) -> &str {
        match self {
            StatusKeyword::KeyCreated => "KEY_CREATED",
            StatusKeyword::KeyNotCreated => "KEY_NOT_CREATED",
            StatusKeyword::KeyConsidered => "KEY_CONSIDERED",
            StatusKeyword::ImportOk => "IMPORT_OK",
            StatusKeyword::ImportProblem => "IMPORT_PROBLEM",
            StatusKeyword::ImportRes => "IMPORT_RES",
            StatusKeyword::Imported => "IMPORTED",
            StatusKeyword::NeedPassphrase => "NEED_PASSPHRASE",
            StatusKeyword::GoodPassphrase => "GOOD_PASSPHRASE",
            StatusKeyword::BadPassphrase => "BAD_PASSPHRASE",
            StatusKeyword::MissingPassphrase => "MISSING_PASSPHRASE",
            StatusKeyword::GetHidden => "GET_HIDDEN",
            StatusKeyword::GetLine => "GET_LINE",
            StatusKeyword::Failure => "FAILURE",
            StatusKeyword::Error => "ERROR",
            StatusKeyword::Other(token) => token,
        }
    }
}

impl fmt::Display for StatusKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// One decoded status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub keyword: StatusKeyword,
    /// Everything after the keyword, verbatim; empty when the line had none
    pub text: String,
}

impl StatusRecord {
    pub fn new(keyword: StatusKeyword, text: &str) -> Self {
        Self {
            keyword,
            text: text.to_string(),
        }
    }

    /// Decode one line, or `None` if it is not a status line
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let rest = line.strip_prefix(STATUS_MARKER)?.strip_prefix(' ')?;
        let (token, text) = rest.split_once(' ').unwrap_or((rest, ""));
        if token.is_empty() {
            return None;
        }

        Some(Self::new(StatusKeyword::from_token(token), text))
    }

    /// The `index`-th space separated token of the payload
    pub fn token(&self, index: usize) -> Option<&str> {
        self.text.split(' ').filter(|t| !t.is_empty()).nth(index)
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{} {}", STATUS_MARKER, self.keyword)
        } else {
            write!(f, "{} {} {}", STATUS_MARKER, self.keyword, self.text)
        }
    }
}

/// Ordered status records of a single gpg invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLog {
    records: Vec<StatusRecord>,
}

impl StatusLog {
    /// Decode a whole status stream, keeping protocol lines in order
    pub fn parse(text: &str) -> Self {
        Self {
            records: text.lines().filter_map(StatusRecord::parse_line).collect(),
        }
    }

    /// First record carrying `keyword`
    pub fn first(&self, keyword: &StatusKeyword) -> Option<&StatusRecord> {
        self.records.iter().find(|record| &record.keyword == keyword)
    }

    pub fn contains(&self, keyword: &StatusKeyword) -> bool {
        self.first(keyword).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<StatusRecord> {
        self.records
    }
}

impl From<Vec<StatusRecord>> for StatusLog {
    fn from(records: Vec<StatusRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a StatusLog {
    type Item = &'a StatusRecord;
    type IntoIter = std::slice::Iter<'a, StatusRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Shorthand for `StatusLog::parse(text).into_records()`
pub fn parse_status(text: &str) -> Vec<StatusRecord> {
    StatusLog::parse(text).into_records()
}

/// The human-readable lines of a status stream (non-protocol, non-blank)
pub fn diagnostic_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty() && !line.starts_with(STATUS_MARKER))
}
