use super::*;
use proptest::prelude::*;

fn rendered(spec: &KeySpec) -> String {
    String::from_utf8(spec.batch_input().as_bytes().to_vec()).unwrap()
}

#[test]
fn test_generation_block_layout() {
    let spec = KeySpec::new(1024, "me@foo.com", "myname", "comment", "qweqwe").unwrap();
    assert_eq!(
        rendered(&spec),
        "Key-Type: RSA\n\
         Key-Length: 1024\n\
         Name-Real: myname\n\
         Name-Comment: comment\n\
         Name-Email: me@foo.com\n\
         Expire-Date: 0\n\
         Passphrase: qweqwe\n\
         %commit\n"
    );
}

#[test]
fn test_key_type_first_and_block_terminated() {
    for length in KeyLength::ALL {
        let spec = KeySpec::new(length.bits(), "a@b.c", "", "", "").unwrap();
        let block = rendered(&spec);
        assert!(block.starts_with("Key-Type: RSA\n"));
        assert!(block.ends_with("%commit\n"));
        assert!(block.contains(&format!("Key-Length: {}\n", length)));
    }
}

#[test]
fn test_empty_optional_fields_omitted() {
    let spec = KeySpec::new(2048, "me@foo.com", "", "", "").unwrap();
    let block = rendered(&spec);
    assert!(!block.contains("Name-Real"));
    assert!(!block.contains("Name-Comment"));
    assert!(!block.contains("Passphrase"));
    assert!(block.contains("Name-Email: me@foo.com\n"));
}

#[test]
fn test_empty_passphrase_requests_no_protection() {
    let spec = KeySpec::new(1024, "me@foo.com", "myname", "", "").unwrap();
    assert_eq!(
        rendered(&spec),
        "Key-Type: RSA\n\
         Key-Length: 1024\n\
         Name-Real: myname\n\
         Name-Email: me@foo.com\n\
         Expire-Date: 0\n\
         %no-protection\n\
         %commit\n"
    );

    let protected = KeySpec::new(1024, "me@foo.com", "myname", "", "qweqwe").unwrap();
    assert!(!rendered(&protected).contains("%no-protection"));
}

#[test]
fn test_secret_buffers_sized_up_front() {
    let long = "x".repeat(300);
    let spec = KeySpec::new(2048, &long, &long, &long, &long).unwrap();
    let block = spec.batch_input();
    assert_eq!(block.capacity(), block.len());

    let line = passphrase_input("qweqwe").unwrap();
    assert_eq!(line.as_bytes(), b"qweqwe\n");
    assert_eq!(line.capacity(), line.len());

    let transcript = passphrase_change_input(&long, &long).unwrap();
    assert_eq!(transcript.capacity(), transcript.len());

    let err = passphrase_input("qwe\nqwe").unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_FIELD_VALUE);
}

#[test]
fn test_rendering_is_deterministic() {
    let spec = KeySpec::new(2048, "me@foo.com", "myname", "c", "p").unwrap();
    assert_eq!(spec.batch_input().as_bytes(), spec.batch_input().as_bytes());
}

#[test]
fn test_rejected_lengths() {
    for bits in [0, 512, 1023, 3072, 4096] {
        let err = KeySpec::new(bits, "me@foo.com", "myname", "", "").unwrap_err();
        assert!(matches!(err, GnupgError::InvalidParameter { .. }));
        assert_eq!(err.error_code(), error_codes::INVALID_KEY_LENGTH);
    }
}

#[test]
fn test_line_breaks_rejected() {
    let err = KeySpec::new(1024, "me@foo.com", "my\nname", "", "").unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_FIELD_VALUE);

    let err = KeySpec::new(1024, "me@foo.com", "n", "", "pass\n%commit").unwrap_err();
    // The passphrase itself never shows up in the error
    assert!(!err.to_string().contains("pass\n"));
}

#[test]
fn test_user_id_required() {
    let err = KeySpec::new(1024, "", "", "comment", "x").unwrap_err();
    assert_eq!(err.error_code(), error_codes::MISSING_USER_ID);
}

#[test]
fn test_spec_debug_hides_passphrase() {
    let spec = KeySpec::new(1024, "me@foo.com", "myname", "", "qweqwe").unwrap();
    assert!(!format!("{:?}", spec).contains("qweqwe"));
}

#[test]
fn test_passphrase_transcript() {
    let input = passphrase_change_input("old", "new").unwrap();
    assert_eq!(input.as_bytes(), b"passwd\nold\nnew\nsave\n");

    let err = passphrase_change_input("old\nsave", "new").unwrap_err();
    assert!(matches!(err, GnupgError::InvalidParameter { .. }));
}

proptest! {
    #[test]
    fn prop_only_accepted_lengths_validate(bits in any::<u32>()) {
        let result = KeyLength::try_from(bits);
        prop_assert_eq!(result.is_ok(), bits == 1024 || bits == 2048);
    }
}
