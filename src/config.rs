use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Attribute catalog to use instead of the bundled table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    /// Provider snapshot read when --snapshot is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    /// Abort on the first drive whose readings cannot be fetched
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Warn when an attribute is this many points above its threshold (0 = disabled).
    #[serde(default = "AlertConfig::default_margin")]
    pub threshold_margin: u8,
    /// Raise an info alert for drives that returned no failure prediction.
    #[serde(default = "AlertConfig::default_report_unknown")]
    pub report_unknown_status: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl AlertConfig {
    fn default_margin() -> u8 { 10 }
    fn default_report_unknown() -> bool { true }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_margin:      Self::default_margin(),
            report_unknown_status: Self::default_report_unknown(),
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Load from the user config dir. A missing file is replaced by defaults
    /// (written out best-effort); an unreadable one falls back to defaults.
    pub fn load() -> Self {
        let path = match Config::config_path() {
            Some(p) => p,
            None    => return Config::default(),
        };
        if !path.exists() {
            let _ = try_write_defaults(&path);
            return Config::default();
        }
        match Config::load_from(&path) {
            Ok(c)  => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("smartinv").join("smartinv.toml"))
    }
}

fn try_write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# smartinv configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}
