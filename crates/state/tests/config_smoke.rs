use std::fs;
use t2sc_state::{ensure_directory, write_atomic, CliOverrides, RunConfig, PRIVATE_DIR_MODE};
use t2sc_test_utils::{env_guard, set_env_var};
use tempfile::tempdir;

#[test]
fn resolve_reads_home_env_and_settings_file() {
    let _g = env_guard();
    let tmp = tempdir().unwrap();
    let settings = tmp.path().join("settings.json");
    fs::write(&settings, r#"{"fragment": "config.d/favorites", "protocol": "SFTP"}"#).unwrap();

    let _home = set_env_var("HOME", tmp.path().to_str());
    let _settings = set_env_var("T2SC_SETTINGS", settings.to_str());
    let _strict = set_env_var("T2SC_STRICT", Some("1"));
    let _ssh = set_env_var("T2SC_SSH_DIR", None);
    let _fragment = set_env_var("T2SC_FRAGMENT", None);
    let _inline = set_env_var("T2SC_INLINE", None);

    let cfg = RunConfig::resolve(&CliOverrides::default()).unwrap();
    assert_eq!(cfg.paths.ssh_dir, tmp.path().join(".ssh"));
    assert_eq!(
        cfg.paths.fragment,
        Some(tmp.path().join(".ssh/config.d/favorites"))
    );
    assert_eq!(cfg.paths.include_pattern, "config.d/*");
    assert!(cfg.strict);
}

#[test]
fn bootstrap_then_atomic_write() {
    let tmp = tempdir().unwrap();
    let fragment_dir = tmp.path().join(".ssh/config.d");
    assert!(ensure_directory(&fragment_dir, PRIVATE_DIR_MODE).unwrap());

    let fragment = fragment_dir.join("transmit");
    write_atomic(&fragment, "Host a\n").unwrap();
    write_atomic(&fragment, "Host b\n").unwrap();
    assert_eq!(fs::read_to_string(&fragment).unwrap(), "Host b\n");
}
