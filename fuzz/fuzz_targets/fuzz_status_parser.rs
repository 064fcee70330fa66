#![no_main]

use gnupg_keyring::armor::ArmorKind;
use gnupg_keyring::status::{diagnostic_lines, StatusLog, StatusRecord, STATUS_MARKER};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let log = StatusLog::parse(&text);
    let protocol_lines = text
        .lines()
        .filter(|line| line.starts_with(STATUS_MARKER))
        .count();
    assert!(log.len() <= protocol_lines);

    // Every decoded record prints back as a line that decodes to itself
    for record in &log {
        let printed = record.to_string();
        if printed.ends_with('\r') {
            continue;
        }
        assert_eq!(StatusRecord::parse_line(&printed).as_ref(), Some(record));
        let _ = record.token(1);
    }

    let _ = diagnostic_lines(&text).count();
    let _ = ArmorKind::detect(&text);
});
