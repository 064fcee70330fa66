// Status-channel transcripts captured from gpg 2.2 runs, with the records
// each one must decode to. Fingerprints have been replaced by fixed values.

pub mod transcripts;

use gnupg_keyring::StatusKeyword;

/// One captured stderr stream and its expected protocol content
pub struct StatusVector {
    pub name: &'static str,
    pub operation: &'static str,
    pub stderr: &'static str,
    pub stdout: &'static str,
    pub expected: &'static [(&'static str, &'static str)],
}

impl StatusVector {
    pub fn expected_keywords(&self) -> Vec<StatusKeyword> {
        self.expected
            .iter()
            .map(|(token, _)| StatusKeyword::from_token(token))
            .collect()
    }
}

/// All captured transcripts
pub fn all_vectors() -> Vec<StatusVector> {
    vec![
        transcripts::generate_rsa_1024(),
        transcripts::generate_failed(),
        transcripts::import_public(),
        transcripts::import_garbage(),
        transcripts::passwd_good(),
        transcripts::passwd_bad(),
        transcripts::export_public(),
    ]
}
