use std::env;

use gnupg_keyring::error::GnupgResult;
use gnupg_keyring::prelude::*;

/// Runs generate -> export -> delete against the configured gpg.
///
/// The optional first argument is the gpg home directory to use; point it
/// at a scratch directory unless you want a test key in your real keyring.
fn main() -> GnupgResult<()> {
    println!("Testing gnupg-keyring against the local gpg...");

    let mut config = GnupgConfig::from_env()?.with_loopback_pinentry(true);
    if let Some(homedir) = env::args_os().nth(1) {
        config = config.with_homedir(homedir);
    }
    println!("gpg binary: {}", config.binary().display());
    println!("home directory: {}", config.homedir().display());

    let gpg = Gnupg::new(config);
    run_scenario(&gpg)
}

fn run_scenario(gpg: &Gnupg) -> GnupgResult<()> {
    println!("\n=== Generating a 2048-bit key pair ===");
    let key_id = gpg.generate_key(2048, "me@foo.com", "myname", "comment", "qweqwe")?;
    println!("Created key {}", key_id);

    let public = gpg.export_public_key(key_id.as_str())?;
    println!(
        "Exported {} ({} lines)",
        ArmorKind::PublicKey,
        public.lines().count()
    );

    gpg.delete_keys(&[&key_id])?;
    println!("Deleted key {}", key_id);

    match gpg.export_public_key(key_id.as_str()) {
        Err(GnupgError::ProcessError { .. }) => {
            println!("✓ Export after deletion failed as expected")
        }
        Err(e) => return Err(e),
        Ok(_) => println!("✗ Key is still exportable after deletion"),
    }

    println!("=== Scenario completed ===\n");
    Ok(())
}
