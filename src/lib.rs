// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::{ConfigFile, IgnoreRule};
use crate::errors::Result;
use crate::watch::{spawn_watcher, WatchEvent, WatchFilter, WatcherOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the compiled ignore filter
/// - the file watcher (native or polling)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let filter = WatchFilter::from_rules(&cfg.server.watch.ignored)?;

    if !args.check.is_empty() {
        print_checks(&filter, &args.check);
        return Ok(());
    }

    let options = WatcherOptions::from_config(&cfg.server.watch);

    // Watch event channel.
    let (tx, mut rx) = mpsc::channel::<WatchEvent>(64);

    let root_dir = config_root_dir(&config_path);
    let _watcher_handle = spawn_watcher(root_dir, filter, &options, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(WatchEvent::ShutdownRequested).await;
        });
    }

    info!(
        base = %cfg.base,
        port = cfg.server.port,
        "watching for the dev server (Ctrl-C to stop)"
    );

    while let Some(event) = rx.recv().await {
        match event {
            WatchEvent::PathChanged { path } => {
                info!(path = %path, "file changed");
            }
            WatchEvent::ShutdownRequested => {
                info!("shutdown requested");
                break;
            }
        }
    }

    Ok(())
}

/// Figure out a sensible project root for watching.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Evaluate the compiled filter against user-supplied paths and print one
/// verdict per line. Used by `--check`.
fn print_checks(filter: &WatchFilter, paths: &[String]) {
    for path in paths {
        let verdict = if filter.is_ignored(path) {
            "ignore"
        } else {
            "watch"
        };
        println!("{verdict}\t{path}");
    }
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("devwatch dry-run");
    println!("  base = {}", cfg.base);
    println!("  server.port = {}", cfg.server.port);
    println!("  server.watch.use_polling = {}", cfg.server.watch.use_polling);
    if cfg.server.watch.use_polling {
        println!(
            "  server.watch.poll_interval_ms = {}",
            cfg.server.watch.poll_interval_ms
        );
    }
    println!();

    println!("ignore rules ({}):", cfg.server.watch.ignored.len());
    for rule in cfg.server.watch.ignored.iter() {
        match rule {
            IgnoreRule::Contains { contains } => println!("  - contains: {contains:?}"),
            IgnoreRule::Suffix { suffix } => println!("  - suffix:   {suffix:?}"),
            IgnoreRule::Glob { glob } => println!("  - glob:     {glob:?}"),
        }
    }
}
