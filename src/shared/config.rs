//! Application configuration. Backend credentials, paths, action PIN.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data";

const URL_PLACEHOLDER: &str = "your-project-ref";
const KEY_PLACEHOLDER: &str = "your-anon-key";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Project URL, e.g. `https://abc.supabase.co`. Also read from SUPABASE_URL.
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Public anon key. Also read from SUPABASE_ANON_KEY.
    #[serde(default)]
    pub supabase_anon_key: Option<String>,

    #[serde(default)]
    pub data_dir: Option<String>,

    /// Where CSV exports are written. Defaults to `<data_dir>/exports`.
    #[serde(default)]
    pub export_dir: Option<String>,

    /// Shared PIN for edit/delete. Unset disables both actions.
    #[serde(default)]
    pub action_pin: Option<String>,

    /// Credentials for the local sign-in used without a hosted backend.
    #[serde(default)]
    pub local_admin_email: Option<String>,

    #[serde(default)]
    pub local_admin_password: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("CLINIC_ADMIN"));
        if let Ok(path) = std::env::var("CLINIC_ADMIN_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Unprefixed names match the hosted project's own .env convention.
        if cfg.supabase_url.is_none() {
            cfg.supabase_url = non_empty_env("SUPABASE_URL");
        }
        if cfg.supabase_anon_key.is_none() {
            cfg.supabase_anon_key = non_empty_env("SUPABASE_ANON_KEY");
        }
        Ok(cfg)
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn export_dir_or_default(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("exports"))
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir_or_default().join("state.json")
    }

    /// Trimmed PIN, `None` when unset or blank.
    pub fn action_pin(&self) -> Option<String> {
        self.action_pin
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
    }

    /// True when both URL and key are set and neither is a template placeholder.
    pub fn is_supabase_configured(&self) -> bool {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => {
                url.starts_with("https://")
                    && !url.contains(URL_PLACEHOLDER)
                    && !key.trim().is_empty()
                    && !key.contains(KEY_PLACEHOLDER)
            }
            _ => false,
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
