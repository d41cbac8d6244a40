use std::error::Error;
use std::fs;
use std::path::PathBuf;

use devwatch::config::load_and_validate;

type TestResult = Result<(), Box<dyn Error>>;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

#[test]
fn bad_glob_rule_is_rejected_at_load_time() {
    let err = load_and_validate(testdata("bad-glob.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("invalid glob"));
}

#[test]
fn relative_base_is_rejected_at_load_time() {
    let err = load_and_validate(testdata("relative-base.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("`base`"));
}

#[test]
fn missing_file_reports_its_path() {
    let err = load_and_validate(testdata("no-such-file.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("no-such-file.toml"));
}

#[test]
fn zero_port_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Devwatch.toml");
    fs::write(&path, "[server]\nport = 0\n")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(format!("{err:#}").contains("port"));

    Ok(())
}

#[test]
fn empty_config_file_is_valid_with_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Devwatch.toml");
    fs::write(&path, "")?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.base, "/");
    assert_eq!(cfg.server.port, 8080);
    assert!(cfg.server.watch.ignored.is_empty());

    Ok(())
}
