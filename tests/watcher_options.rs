use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use devwatch::config::load_and_validate;
use devwatch::watch::WatcherOptions;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn polling_config_selects_polling_backend() -> TestResult {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("testdata/fusil-site.toml"))?;

    let options = WatcherOptions::from_config(&cfg.server.watch);
    assert!(options.use_polling);
    // The file doesn't set an interval, so the default applies.
    assert_eq!(options.poll_interval, Duration::from_millis(500));

    Ok(())
}

#[test]
fn native_backend_is_the_default() -> TestResult {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("testdata/glob-rules.toml"))?;

    let options = WatcherOptions::from_config(&cfg.server.watch);
    assert!(!options.use_polling);

    Ok(())
}
