// src/watch/mod.rs

//! File watching and change filtering.
//!
//! This module is responsible for:
//! - Compiling the configured ignore rules into a [`WatchFilter`].
//! - Wiring up a cross-platform filesystem watcher (`notify`), native or
//!   polling per configuration.
//!
//! It does **not** serve anything or rebuild anything; it only turns
//! filesystem changes into filtered change events for whoever consumes them.

pub mod filter;
pub mod watcher;

pub use filter::WatchFilter;
pub use watcher::{spawn_watcher, WatchEvent, WatcherHandle, WatcherOptions};
