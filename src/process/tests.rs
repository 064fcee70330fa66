use super::*;

fn config_for(binary: &str) -> GnupgConfig {
    GnupgConfig::with_binary_path(binary)
        .unwrap()
        .with_homedir(std::env::temp_dir())
}

#[test]
fn test_invocation_builder() {
    let invocation = Invocation::new("export_public_key")
        .args(["--export", "-a"])
        .arg("0123ABCD");
    assert_eq!(invocation.operation(), "export_public_key");
    assert_eq!(invocation.arguments(), ["--export", "-a", "0123ABCD"]);
    assert!(invocation.payload().is_empty());

    let invocation = invocation.input(SecureBytes::from("key material"));
    assert_eq!(invocation.payload(), b"key material");
}

#[test]
fn test_invocation_debug_hides_payload() {
    let invocation = Invocation::new("change_passphrase")
        .input(SecureBytes::from("passwd\nhunter2\nnew\nsave\n"));
    assert!(!format!("{:?}", invocation).contains("hunter2"));
}

#[test]
fn test_output_status_log() {
    let output = ProcessOutput::new(
        Vec::new(),
        "gpg: some noise\n[GNUPG:] IMPORT_OK 1 ABCDEF0123456789\n",
    );
    let log = output.status_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log.iter().next().unwrap().text, "1 ABCDEF0123456789");
}

#[test]
fn test_diagnostic_tail_keeps_last_lines() {
    let mut text = String::new();
    for i in 0..20 {
        text.push_str(&format!("gpg: line {}\n[GNUPG:] PROGRESS x {}\n", i, i));
    }
    let tail = diagnostic_tail(&text);
    let lines: Vec<&str> = tail.lines().collect();
    assert_eq!(lines.len(), DIAGNOSTIC_TAIL);
    assert_eq!(lines[0], "gpg: line 12");
    assert_eq!(lines[DIAGNOSTIC_TAIL - 1], "gpg: line 19");
}

#[test]
fn test_missing_executable_is_process_error() {
    let config = config_for("/nonexistent/path/to/gpg");
    let err = GpgProcess
        .run(&config, &Invocation::new("export_public_key").arg("--export"))
        .unwrap_err();
    assert!(matches!(err, GnupgError::ProcessError { .. }));
    assert_eq!(err.error_code(), error_codes::PROCESS_SPAWN_FAILED);
}

#[cfg(unix)]
#[test]
fn test_non_zero_exit_is_process_error() {
    let config = config_for("false");
    let err = GpgProcess
        .run(&config, &Invocation::new("delete_public_keys"))
        .unwrap_err();
    match err {
        GnupgError::ProcessError {
            exit_code,
            error_code,
            ..
        } => {
            assert_eq!(exit_code, Some(1));
            assert_eq!(error_code, error_codes::PROCESS_EXIT_FAILURE);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_clean_exit_without_output() {
    let config = config_for("true");
    let output = GpgProcess
        .run(&config, &Invocation::new("delete_private_keys"))
        .unwrap();
    assert!(output.stdout.is_empty());
    assert!(output.status_log().is_empty());
}

#[cfg(unix)]
#[test]
fn test_unread_stdin_is_short_write() {
    // `true` exits without reading; a payload larger than any pipe buffer
    // cannot be delivered in full
    let config = config_for("true");
    let payload = vec![b'k'; 4 * 1024 * 1024];
    let err = GpgProcess
        .run(
            &config,
            &Invocation::new("import_key").input(SecureBytes::from(payload)),
        )
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::PROCESS_STDIN_FAILED);
}
