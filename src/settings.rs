//! Application settings storage
//!
//! Settings live in a JSON file in the user config directory. Environment
//! variables take precedence over stored values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_SUPABASE_URL: &str = "PORTFOLIO_SUPABASE_URL";
pub const ENV_SUPABASE_KEY: &str = "PORTFOLIO_SUPABASE_KEY";
pub const ENV_BIND: &str = "PORTFOLIO_BIND";

/// Items per page, per listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSizes {
    #[serde(default = "default_gallery")]
    pub gallery: usize,
    #[serde(default = "default_archive")]
    pub archive: usize,
    #[serde(default = "default_recommendations")]
    pub recommendations: usize,
    #[serde(default = "default_skills")]
    pub skills: usize,
    #[serde(default = "default_achievements")]
    pub achievements: usize,
}

fn default_gallery() -> usize {
    6
}

fn default_archive() -> usize {
    5
}

fn default_recommendations() -> usize {
    4
}

fn default_skills() -> usize {
    8
}

fn default_achievements() -> usize {
    4
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            gallery: default_gallery(),
            archive: default_archive(),
            recommendations: default_recommendations(),
            skills: default_skills(),
            achievements: default_achievements(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Project URL of the hosted table store, e.g. https://xyz.supabase.co
    #[serde(default)]
    pub supabase_url: Option<String>,
    /// Anonymous (public) API key
    #[serde(default)]
    pub supabase_key: Option<String>,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub page_sizes: PageSizes,
    /// Certifications carousel interval
    #[serde(default = "default_autoslide_ms")]
    pub autoslide_interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_autoslide_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            bind: default_bind(),
            page_sizes: PageSizes::default(),
            autoslide_interval_ms: default_autoslide_ms(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults when missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Settings::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("[Settings] Ignoring malformed {}: {}", path.display(), e);
                Settings::default()
            }),
            Err(e) => {
                tracing::warn!("[Settings] Failed to read {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }

    /// Load settings, writing a default file on first run so there is
    /// something to edit. A failed write is logged and defaults are used.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load(path);
        }

        let settings = Settings::default();
        match settings.save(path) {
            Ok(()) => tracing::info!("[Settings] Wrote defaults to {}", path.display()),
            Err(e) => tracing::warn!("[Settings] {}", e),
        }
        settings
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, content).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Overlay values from the environment
    pub fn apply_env(mut self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok());
        self
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_SUPABASE_URL) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = non_empty(ENV_SUPABASE_KEY) {
            self.supabase_key = Some(key);
        }
        if let Some(bind) = non_empty(ENV_BIND) {
            self.bind = bind;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn autoslide_interval(&self) -> Duration {
        Duration::from_millis(self.autoslide_interval_ms.max(1))
    }

    /// Key for display (first 8 / last 4 chars)
    pub fn masked_key(&self) -> Option<String> {
        self.supabase_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() > 12 {
                let head: String = chars[..8].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{}...{}", head, tail)
            } else {
                "*".repeat(chars.len())
            }
        })
    }
}

/// Default settings file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("portfolio/settings.json"))
        .unwrap_or_else(|| PathBuf::from("portfolio-settings.json"))
}
