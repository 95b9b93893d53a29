//! End-to-end sync runs against a temporary `~/.ssh`.

use serde_json::Value;
use std::fs;
use t2sc_sshconfig::ConfigModel;
use t2sc_state::SyncPaths;
use t2sc_sync::{
    favorite_to_entry, identity_of, ConfigTarget, Favorite, JsonFileSource, RawFavorite,
    SshConfigTarget, SyncError, SyncOrchestrator, SyncParams, SyncReport,
};
use t2sc_test_utils::{raw_record, TestFixture, ID_A, ID_B, ID_C};

const USER_BLOCK: &str = "Host personal\n  HostName home.example.com\n  User me\n";

fn paths(fixture: &TestFixture, inline: bool) -> SyncPaths {
    SyncPaths {
        ssh_dir: fixture.ssh_dir.clone(),
        main_config: fixture.main_config(),
        fragment: (!inline).then(|| fixture.fragment()),
        include_pattern: "config.d/*".into(),
    }
}

fn run(fixture: &TestFixture, inline: bool, favorites: &[Value]) -> anyhow::Result<SyncReport> {
    let export = fixture.write_favorites_export(favorites, None)?;
    SyncOrchestrator::new(
        JsonFileSource::new(export),
        SshConfigTarget::new(paths(fixture, inline)),
    )
    .sync(&SyncParams::default())
}

fn hosts_in(text: &str) -> Vec<String> {
    ConfigModel::parse(text)
        .iter()
        .filter_map(|e| e.as_directive())
        .filter(|d| d.is_host())
        .map(|d| d.value.clone())
        .collect()
}

#[test]
fn alpha_renamed_to_beta_updates_in_place() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_ssh_file(
            "config",
            &format!(
                "Host before\n  User a\n\nHost alpha\n  #{ID_A}\n  HostName h1\n  User u\n  Port 2222\n\nHost after\n  User b\n"
            ),
        )
        .unwrap();

    let report = run(
        &fixture,
        true,
        &[raw_record("beta", "h1", "u", 2222, "SFTP", ID_A)],
    )
    .unwrap();

    assert_eq!(report.updated.len(), 1);
    assert!(report.added.is_empty());
    assert!(report.deleted.is_empty());
    assert_eq!(report.updated[0].host, "beta");
    assert_eq!(
        fixture.read_ssh_file("config"),
        format!(
            "Host before\n  User a\n\nHost beta\n  #{ID_A}\n  HostName h1\n  User u\n  Port 2222\n\nHost after\n  User b\n"
        )
    );
}

#[test]
fn second_run_is_a_noop() {
    let fixture = TestFixture::new().unwrap();
    let favorites = [
        raw_record("alpha", "h1", "u", 0, "SFTP", ID_A),
        raw_record("beta", "h2", "u", 2200, "SFTP", ID_B),
    ];
    let first = run(&fixture, false, &favorites).unwrap();
    assert_eq!(first.added.len(), 2);
    let written = fixture.read_ssh_file("config.d/transmit");

    let second = run(&fixture, false, &favorites).unwrap();
    assert!(second.is_noop());
    assert!(!second.written);
    assert!(!second.include_added);
    assert_eq!(fixture.read_ssh_file("config.d/transmit"), written);
}

#[test]
fn removed_favorite_is_deleted_and_user_content_kept() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_ssh_file("config", USER_BLOCK).unwrap();
    run(
        &fixture,
        true,
        &[
            raw_record("alpha", "h1", "u", 0, "SFTP", ID_A),
            raw_record("beta", "h2", "u", 0, "SFTP", ID_B),
        ],
    )
    .unwrap();

    let report = run(&fixture, true, &[raw_record("beta", "h2", "u", 0, "SFTP", ID_B)]).unwrap();
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.deleted[0].host, "alpha");

    let text = fixture.read_ssh_file("config");
    assert!(text.starts_with(USER_BLOCK));
    assert_eq!(hosts_in(&text), ["personal", "beta"]);
    assert!(!text.contains(ID_A));
}

#[test]
fn new_favorite_is_appended() {
    let fixture = TestFixture::new().unwrap();
    run(&fixture, false, &[raw_record("alpha", "h1", "u", 0, "SFTP", ID_A)]).unwrap();
    let report = run(
        &fixture,
        false,
        &[
            raw_record("alpha", "h1", "u", 0, "SFTP", ID_A),
            raw_record("gamma", "h3", "u", 0, "SFTP", ID_C),
        ],
    )
    .unwrap();
    assert_eq!(report.added.len(), 1);
    assert_eq!(
        hosts_in(&fixture.read_ssh_file("config.d/transmit")),
        ["alpha", "gamma"]
    );
}

#[test]
fn only_sftp_favorites_are_synced() {
    let fixture = TestFixture::new().unwrap();
    let report = run(
        &fixture,
        false,
        &[
            raw_record("site", "ftp.example.com", "u", 21, "FTP", ID_A),
            raw_record("bucket", "s3.amazonaws.com", "key", 0, "S3", ID_B),
            raw_record("box", "h3", "u", 0, "SFTP", ID_C),
        ],
    )
    .unwrap();
    assert_eq!(report.skipped.len(), 2);
    let text = fixture.read_ssh_file("config.d/transmit");
    assert_eq!(hosts_in(&text), ["box"]);
}

#[test]
fn default_port_is_omitted_and_round_trips() {
    let fixture = TestFixture::new().unwrap();
    let records = [
        raw_record("alpha", "h1", "u", 0, "SFTP", ID_A),
        raw_record("beta", "h2", "u", 2222, "SFTP", ID_B),
    ];
    run(&fixture, false, &records).unwrap();
    let text = fixture.read_ssh_file("config.d/transmit");
    assert_eq!(text.matches("Port").count(), 1);

    let parsed = ConfigModel::parse(&text);
    let blocks: Vec<_> = parsed.iter().filter(|e| identity_of(e).is_some()).collect();
    for (record, block) in records.iter().zip(blocks) {
        let raw: RawFavorite = serde_json::from_value(record.clone()).unwrap();
        let entry = favorite_to_entry(&Favorite::from_raw(&raw, None).unwrap());
        assert!(block.same_structure(&entry));
    }
}

#[test]
fn fragment_mode_adds_include_once() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_ssh_file("config", USER_BLOCK).unwrap();

    let report = run(&fixture, false, &[raw_record("alpha", "h1", "u", 0, "SFTP", ID_A)]).unwrap();
    assert!(report.include_added);
    assert_eq!(report.target, fixture.fragment());
    assert_eq!(
        fixture.read_ssh_file("config"),
        format!("Include config.d/*\n\n{USER_BLOCK}")
    );

    run(&fixture, false, &[raw_record("alpha", "h1", "u", 0, "SFTP", ID_B)]).unwrap();
    assert_eq!(fixture.read_ssh_file("config").matches("Include").count(), 1);
}

#[test]
fn unmanaged_fragment_content_is_preserved() {
    let fixture = TestFixture::new().unwrap();
    let manual = "# hand-written\r\nHost jump\r\n  HostName jump.example.com\r\n";
    fixture.write_ssh_file("config.d/transmit", manual).unwrap();

    run(&fixture, false, &[raw_record("alpha", "h1", "u", 0, "SFTP", ID_A)]).unwrap();
    let text = fixture.read_ssh_file("config.d/transmit");
    assert!(text.starts_with(manual));
    assert!(!text.replace("\r\n", "").contains('\n'));
}

#[test]
fn empty_result_leaves_files_alone() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_ssh_file("config", USER_BLOCK).unwrap();
    let err = run(&fixture, false, &[raw_record("site", "h", "u", 21, "FTP", ID_A)]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::NoFavorites { .. })
    ));
    assert_eq!(fixture.read_ssh_file("config"), USER_BLOCK);
    assert!(!fixture.fragment().exists());
}

#[test]
fn dry_run_reports_but_does_not_write() {
    let fixture = TestFixture::new().unwrap();
    let export = fixture
        .write_favorites_export(&[raw_record("alpha", "h1", "u", 0, "SFTP", ID_A)], None)
        .unwrap();
    let target = SshConfigTarget::new(paths(&fixture, false));
    let report = SyncOrchestrator::new(JsonFileSource::new(export), target.clone())
        .sync(&SyncParams {
            dry_run: true,
            ..Default::default()
        })
        .unwrap();

    assert_eq!(report.change_lines(), ["✓ Would add alpha (u@h1)"]);
    assert!(report.preview.is_some());
    assert!(target.read().unwrap().is_empty());
    assert!(!fixture.main_config().exists());
}

#[test]
fn folders_group_aliases() {
    let fixture = TestFixture::new().unwrap();
    let export = fixture
        .write_favorites_export(
            &[raw_record("Web Server", "h1", "u", 0, "SFTP", ID_A)],
            Some(serde_json::json!([["Client Sites", ["Web Server"]]])),
        )
        .unwrap();
    SyncOrchestrator::new(
        JsonFileSource::new(export),
        SshConfigTarget::new(paths(&fixture, false)),
    )
    .sync(&SyncParams::default())
    .unwrap();
    assert_eq!(
        hosts_in(&fixture.read_ssh_file("config.d/transmit")),
        ["client-sites/web-server"]
    );
}

#[cfg(unix)]
#[test]
fn written_files_are_private() {
    use std::os::unix::fs::PermissionsExt;
    let fixture = TestFixture::new().unwrap();
    run(&fixture, false, &[raw_record("alpha", "h1", "u", 0, "SFTP", ID_A)]).unwrap();
    for path in [fixture.fragment(), fixture.main_config()] {
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "{}", path.display());
    }
    let dir_mode = fs::metadata(fixture.ssh_dir.join("config.d"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(dir_mode, 0o700);
}
