// src/config/model.rs

use serde::{Deserialize, Deserializer};

/// Top-level configuration as read from a TOML file.
///
/// This maps the dev-server settings a project checks in next to its
/// sources:
///
/// ```toml
/// base = "/myapp/"
///
/// [server]
/// port = 5174
///
/// [server.watch]
/// use_polling = true
///
/// [[server.watch.ignored]]
/// contains = "ace-builds"
///
/// [[server.watch.ignored]]
/// suffix = ".fs"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Public URL prefix under which built assets are served/referenced.
    ///
    /// Pass-through for the host dev server; devwatch only validates it.
    #[serde(default = "default_base")]
    pub base: String,

    /// Dev-server settings from `[server]`.
    #[serde(default)]
    pub server: ServerSection,
}

fn default_base() -> String {
    "/".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            base: default_base(),
            server: ServerSection::default(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// TCP port the local dev server binds.
    ///
    /// Accepted as a TOML integer or a string (`port = 5174` and
    /// `port = "5174"` are both valid); tooling that generates these
    /// files is not consistent about it.
    #[serde(default = "default_port", deserialize_with = "de_port")]
    pub port: u16,

    /// File-watching settings from `[server.watch]`.
    #[serde(default)]
    pub watch: WatchSection,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            watch: WatchSection::default(),
        }
    }
}

/// `[server.watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Ordered list of ignore rules; a path matched by *any* rule is
    /// excluded from change notifications.
    #[serde(default)]
    pub ignored: Vec<IgnoreRule>,

    /// Force interval-based polling instead of native OS file events.
    ///
    /// Useful on network mounts and in containers where inotify/FSEvents
    /// don't see changes.
    #[serde(default)]
    pub use_polling: bool,

    /// Polling interval in milliseconds. Only used when `use_polling = true`.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            ignored: Vec::new(),
            use_polling: false,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// A single ignore rule from `[[server.watch.ignored]]`.
///
/// Three forms, distinguished by their key:
///
/// - `{ contains = "ace-builds" }` — substring containment anywhere in the
///   path. Deliberately *not* segment-aware: `"ace-builds-backup.txt"`
///   matches too. Use a `glob` rule when that precision matters.
/// - `{ suffix = ".fs" }` — literal trailing text, compared as-is.
/// - `{ glob = "vendor/**" }` — a `globset` pattern against the
///   root-relative path.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged, deny_unknown_fields)]
pub enum IgnoreRule {
    Contains { contains: String },
    Suffix { suffix: String },
    Glob { glob: String },
}

/// Accept `port = 5174` as well as `port = "5174"`.
fn de_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(n) => Ok(n),
        PortRepr::Text(s) => s
            .trim()
            .parse::<u16>()
            .map_err(|e| serde::de::Error::custom(format!("invalid port {s:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_accepts_number_and_string() {
        let numeric: ConfigFile = toml::from_str("[server]\nport = 5174").unwrap();
        assert_eq!(numeric.server.port, 5174);

        let text: ConfigFile = toml::from_str("[server]\nport = \"5174\"").unwrap();
        assert_eq!(text.server.port, 5174);
    }

    #[test]
    fn port_rejects_garbage_string() {
        let res = toml::from_str::<ConfigFile>("[server]\nport = \"http\"");
        assert!(res.is_err());
    }

    #[test]
    fn empty_file_gets_defaults() {
        let cfg: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(cfg.base, "/");
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.server.watch.use_polling);
        assert!(cfg.server.watch.ignored.is_empty());
        assert_eq!(cfg.server.watch.poll_interval_ms, 500);
    }

    #[test]
    fn ignore_rules_deserialize_by_key() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [[server.watch.ignored]]
            contains = "ace-builds"

            [[server.watch.ignored]]
            suffix = ".fs"

            [[server.watch.ignored]]
            glob = "vendor/**"
            "#,
        )
        .unwrap();

        assert_eq!(
            cfg.server.watch.ignored,
            vec![
                IgnoreRule::Contains {
                    contains: "ace-builds".to_string()
                },
                IgnoreRule::Suffix {
                    suffix: ".fs".to_string()
                },
                IgnoreRule::Glob {
                    glob: "vendor/**".to_string()
                },
            ]
        );
    }
}
