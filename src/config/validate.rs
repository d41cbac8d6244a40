// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use globset::Glob;

use crate::config::model::{ConfigFile, IgnoreRule};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `base` is non-empty and starts with `/`
/// - `server.port` is non-zero
/// - `server.watch.poll_interval_ms` is at least 1
/// - every ignore rule carries a non-empty marker
/// - every `glob` rule compiles
///
/// It does **not** check whether the port is actually bindable; that is the
/// host dev server's problem at startup.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_base(cfg)?;
    validate_server(cfg)?;
    validate_ignore_rules(cfg)?;
    Ok(())
}

fn validate_base(cfg: &ConfigFile) -> Result<()> {
    if cfg.base.is_empty() {
        return Err(anyhow!("`base` must not be empty (use \"/\" for the root)"));
    }
    if !cfg.base.starts_with('/') {
        return Err(anyhow!(
            "`base` must be an absolute URL prefix starting with '/' (got {:?})",
            cfg.base
        ));
    }
    Ok(())
}

fn validate_server(cfg: &ConfigFile) -> Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow!("[server].port must be >= 1 (got 0)"));
    }
    if cfg.server.watch.poll_interval_ms == 0 {
        return Err(anyhow!(
            "[server.watch].poll_interval_ms must be >= 1 (got 0)"
        ));
    }
    Ok(())
}

fn validate_ignore_rules(cfg: &ConfigFile) -> Result<()> {
    for (idx, rule) in cfg.server.watch.ignored.iter().enumerate() {
        match rule {
            IgnoreRule::Contains { contains } => {
                if contains.is_empty() {
                    return Err(anyhow!(
                        "ignore rule #{idx}: `contains` marker must not be empty \
                         (an empty marker would match every path)"
                    ));
                }
            }
            IgnoreRule::Suffix { suffix } => {
                if suffix.is_empty() {
                    return Err(anyhow!(
                        "ignore rule #{idx}: `suffix` marker must not be empty \
                         (an empty marker would match every path)"
                    ));
                }
            }
            IgnoreRule::Glob { glob } => {
                Glob::new(glob)
                    .with_context(|| format!("ignore rule #{idx}: invalid glob {glob:?}"))?;
            }
        }
    }
    Ok(())
}
