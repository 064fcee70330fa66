use super::StatusVector;

pub const FINGERPRINT: &str = "6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C";

pub fn generate_rsa_1024() -> StatusVector {
    StatusVector {
        name: "generate_rsa_1024",
        operation: "generate_key_pair",
        stderr: "\
gpg: keybox '/tmp/gpg-home/pubring.kbx' created
[GNUPG:] KEY_CONSIDERED 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0
gpg: /tmp/gpg-home/trustdb.gpg: trustdb created
gpg: key C5D6E7F8091A2B3C marked as ultimately trusted
gpg: directory '/tmp/gpg-home/openpgp-revocs.d' created
gpg: revocation certificate stored as '/tmp/gpg-home/openpgp-revocs.d/6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C.rev'
[GNUPG:] KEY_CREATED P 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C
",
        stdout: "",
        expected: &[
            ("KEY_CONSIDERED", "6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0"),
            ("KEY_CREATED", "P 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C"),
        ],
    }
}

pub fn generate_failed() -> StatusVector {
    StatusVector {
        name: "generate_failed",
        operation: "generate_key_pair",
        stderr: "\
gpg: agent_genkey failed: No pinentry
[GNUPG:] ERROR key_generate 67108949
gpg: key generation failed: No pinentry
[GNUPG:] KEY_NOT_CREATED
",
        stdout: "",
        expected: &[("ERROR", "key_generate 67108949"), ("KEY_NOT_CREATED", "")],
    }
}

pub fn import_public() -> StatusVector {
    StatusVector {
        name: "import_public",
        operation: "import_key",
        stderr: "\
[GNUPG:] KEY_CONSIDERED 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0
gpg: key C5D6E7F8091A2B3C: public key \"myname (comment) <me@foo.com>\" imported
[GNUPG:] IMPORTED C5D6E7F8091A2B3C myname (comment) <me@foo.com>
[GNUPG:] IMPORT_OK 1 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C
gpg: Total number processed: 1
gpg:               imported: 1
[GNUPG:] IMPORT_RES 1 0 1 0 0 0 0 0 0 0 0 0 0 0 0
",
        stdout: "",
        expected: &[
            ("KEY_CONSIDERED", "6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0"),
            ("IMPORTED", "C5D6E7F8091A2B3C myname (comment) <me@foo.com>"),
            ("IMPORT_OK", "1 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C"),
            ("IMPORT_RES", "1 0 1 0 0 0 0 0 0 0 0 0 0 0 0"),
        ],
    }
}

pub fn import_garbage() -> StatusVector {
    StatusVector {
        name: "import_garbage",
        operation: "import_key",
        stderr: "\
gpg: no valid OpenPGP data found.
[GNUPG:] NODATA 1
gpg: Total number processed: 0
[GNUPG:] IMPORT_RES 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
",
        stdout: "",
        expected: &[("NODATA", "1"), ("IMPORT_RES", "0 0 0 0 0 0 0 0 0 0 0 0 0 0 0")],
    }
}

pub fn passwd_good() -> StatusVector {
    StatusVector {
        name: "passwd_good",
        operation: "change_passphrase",
        stderr: "\
[GNUPG:] KEY_CONSIDERED 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0
[GNUPG:] GET_LINE keyedit.prompt
[GNUPG:] GOT_IT
[GNUPG:] INQUIRE_MAXLEN 100
[GNUPG:] GET_HIDDEN passphrase.enter
[GNUPG:] GOT_IT
[GNUPG:] INQUIRE_MAXLEN 100
[GNUPG:] GET_HIDDEN passphrase.enter
[GNUPG:] GOT_IT
[GNUPG:] GET_LINE keyedit.prompt
[GNUPG:] GOT_IT
",
        stdout: "",
        expected: &[
            ("KEY_CONSIDERED", "6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0"),
            ("GET_LINE", "keyedit.prompt"),
            ("GOT_IT", ""),
            ("INQUIRE_MAXLEN", "100"),
            ("GET_HIDDEN", "passphrase.enter"),
            ("GOT_IT", ""),
            ("INQUIRE_MAXLEN", "100"),
            ("GET_HIDDEN", "passphrase.enter"),
            ("GOT_IT", ""),
            ("GET_LINE", "keyedit.prompt"),
            ("GOT_IT", ""),
        ],
    }
}

// gpg 2.2 reports a wrong old passphrase only as a diagnostic; the new
// passphrase and `save` are then read at the edit prompt and gpg exits 0
pub fn passwd_bad() -> StatusVector {
    StatusVector {
        name: "passwd_bad",
        operation: "change_passphrase",
        stderr: "\
[GNUPG:] KEY_CONSIDERED 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0
[GNUPG:] GET_LINE keyedit.prompt
[GNUPG:] GOT_IT
[GNUPG:] INQUIRE_MAXLEN 100
[GNUPG:] GET_HIDDEN passphrase.enter
[GNUPG:] GOT_IT
gpg: key C5D6E7F8091A2B3C/C5D6E7F8091A2B3C: error changing passphrase: Bad passphrase
[GNUPG:] GET_LINE keyedit.prompt
[GNUPG:] GOT_IT
[GNUPG:] GET_LINE keyedit.prompt
[GNUPG:] GOT_IT
",
        stdout: "",
        expected: &[
            ("KEY_CONSIDERED", "6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C 0"),
            ("GET_LINE", "keyedit.prompt"),
            ("GOT_IT", ""),
            ("INQUIRE_MAXLEN", "100"),
            ("GET_HIDDEN", "passphrase.enter"),
            ("GOT_IT", ""),
            ("GET_LINE", "keyedit.prompt"),
            ("GOT_IT", ""),
            ("GET_LINE", "keyedit.prompt"),
            ("GOT_IT", ""),
        ],
    }
}

pub fn export_public() -> StatusVector {
    StatusVector {
        name: "export_public",
        operation: "export_public_key",
        stderr: "[GNUPG:] EXPORTED 6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C\n",
        stdout: "\
-----BEGIN PGP PUBLIC KEY BLOCK-----

mI0EZXN0aW5nAQQAvH0kZ2VuZXJhdGVkLWZvci10ZXN0cy1vbmx5AAAAAAAAAAAA
=Zm9v
-----END PGP PUBLIC KEY BLOCK-----
",
        expected: &[("EXPORTED", "6A2F1B3C4D5E6F708192A3B4C5D6E7F8091A2B3C")],
    }
}
