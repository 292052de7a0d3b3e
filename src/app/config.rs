//! Application configuration: parse/write `crude.conf`.
//!
//! The file uses the same `key = value` format as `theme.conf` and
//! `keybinds.conf`. Command line flags override whatever the file says;
//! see `main.rs`.

use crate::remote::HttpUserService;

/// Settings read from `crude.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the user REST API; `/users` is appended to it.
    pub api_base_url: String,
    /// File that receives log output. No file means no logging, since the
    /// terminal itself belongs to the UI.
    pub log_file: Option<String>,
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: HttpUserService::DEFAULT_BASE_URL.to_string(),
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `path`, fall back to the standard config location, or write a
    /// default file to `path` and return the defaults.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = super::config_file_read_path("crude.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let cfg = Self::default();
        let _ = cfg.write_file(path);
        cfg
    }

    /// Parse a config file. Unknown keys are skipped; `None` if unreadable.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for (key, value) in key_values(contents) {
            match key {
                "api_base_url" => cfg.api_base_url = value.to_string(),
                "log_file" => {
                    cfg.log_file = match value {
                        "none" | "None" | "-" => None,
                        path => Some(path.to_string()),
                    }
                }
                "log_level" => cfg.log_level = value.to_string(),
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# crude-manager configuration\n");
        buf.push_str("# Base URL of the users API (GET/POST {base}/users, PUT/DELETE {base}/users/{id})\n");
        let _ = writeln!(&mut buf, "api_base_url = {}", self.api_base_url);
        buf.push_str("# Log file path, or 'none' to disable logging\n");
        let _ = writeln!(&mut buf, "log_file = {}", self.log_file.as_deref().unwrap_or("none"));
        buf.push_str("# Log filter when RUST_LOG is unset (error|warn|info|debug|trace)\n");
        let _ = writeln!(&mut buf, "log_level = {}", self.log_level);
        std::fs::write(path, buf)
    }
}

/// Iterate the `key = value` pairs of a config file, skipping blank lines,
/// `#` comments and lines where either side is empty.
pub fn key_values(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (lhs, rhs) = line.split_once('=')?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        if lhs.is_empty() || rhs.is_empty() {
            None
        } else {
            Some((lhs, rhs))
        }
    })
}
