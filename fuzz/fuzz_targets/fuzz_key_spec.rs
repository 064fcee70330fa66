#![no_main]

use arbitrary::Arbitrary;
use gnupg_keyring::batch::{passphrase_change_input, KeySpec};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct KeySpecFuzzInput {
    length: u32,
    email: String,
    name: String,
    comment: String,
    passphrase: String,
    new_passphrase: String,
}

fuzz_target!(|input: KeySpecFuzzInput| {
    if let Ok(spec) = KeySpec::new(
        input.length,
        &input.email,
        &input.name,
        &input.comment,
        &input.passphrase,
    ) {
        let block = spec.batch_input();
        let text = std::str::from_utf8(block.as_bytes()).unwrap();

        // Accepted fields can never inject extra parameter lines
        let optional = [&input.name, &input.comment, &input.email]
            .iter()
            .filter(|value| !value.is_empty())
            .count();
        assert_eq!(text.lines().count(), 5 + optional);
        assert_eq!(text.contains("\n%no-protection\n"), input.passphrase.is_empty());
        assert_eq!(block.capacity(), block.len());
        assert!(text.starts_with("Key-Type: RSA\n"));
        assert!(text.ends_with("\n%commit\n"));
    }

    if let Ok(transcript) = passphrase_change_input(&input.passphrase, &input.new_passphrase) {
        assert_eq!(transcript.as_bytes().iter().filter(|&&b| b == b'\n').count(), 4);
    }
});
