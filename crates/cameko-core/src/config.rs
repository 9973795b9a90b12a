use crate::error::CamekoError;
use crate::export::DEFAULT_COMPOSE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CAMEKO_CONFIG";
/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "CAMEKO_STATE_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeConfig {
    #[serde(default = "default_compose_url")]
    pub base_url: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            base_url: default_compose_url(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl AnalyticsConfig {
    /// The endpoint to beacon to, if analytics is switched on and configured.
    #[must_use]
    pub fn active_endpoint(&self) -> Option<&str> {
        if self.enabled {
            self.endpoint.as_deref().filter(|e| !e.trim().is_empty())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Custom roster file replacing the built-in one.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Config plus the paths it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub config_path: Option<PathBuf>,
    pub state_dir: PathBuf,
    pub user: UserConfig,
}

/// Location of the user config file: `$CAMEKO_CONFIG`, else the platform
/// config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("cameko/config.toml"))
}

/// Load the config at `path`; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config(path: &Path) -> Result<UserConfig, CamekoError> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| CamekoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<UserConfig>(&content).map_err(|source| CamekoError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the effective config.
///
/// State directory precedence: explicit override, `$CAMEKO_STATE_DIR`,
/// `[storage] dir`, platform data dir, then `./.cameko`.
///
/// # Errors
///
/// Returns an error when the config file exists but is invalid.
pub fn resolve_config(state_dir_override: Option<&Path>) -> Result<EffectiveConfig, CamekoError> {
    let config_path = user_config_path();
    let user = match &config_path {
        Some(path) => load_user_config(path)?,
        None => UserConfig::default(),
    };

    let env_dir = env::var(STATE_DIR_ENV).ok().filter(|v| !v.trim().is_empty());
    let state_dir = resolve_state_dir(state_dir_override, env_dir.as_deref(), &user);

    Ok(EffectiveConfig {
        config_path,
        state_dir,
        user,
    })
}

fn resolve_state_dir(
    flag: Option<&Path>,
    env_dir: Option<&str>,
    user: &UserConfig,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_dir {
        return PathBuf::from(dir);
    }
    if let Some(dir) = &user.storage.dir {
        return dir.clone();
    }
    crate::store::JsonFileStore::default_dir().unwrap_or_else(|| PathBuf::from(".cameko"))
}

fn default_compose_url() -> String {
    DEFAULT_COMPOSE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_user_config(&dir.path().join("config.toml")).expect("load");
        assert_eq!(cfg, UserConfig::default());
        assert_eq!(cfg.compose.base_url, DEFAULT_COMPOSE_URL);
        assert!(cfg.analytics.active_endpoint().is_none());
    }

    #[test]
    fn config_sections_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
dir = "/tmp/cameko-state"

[compose]
base_url = "https://twitter.com/intent/tweet"

[analytics]
enabled = true
endpoint = "https://beacon.example/collect"

[directory]
path = "/home/alice/roster.toml"
"#,
        )
        .expect("write");

        let cfg = load_user_config(&path).expect("load");
        assert_eq!(cfg.storage.dir, Some(PathBuf::from("/tmp/cameko-state")));
        assert_eq!(cfg.compose.base_url, "https://twitter.com/intent/tweet");
        assert_eq!(
            cfg.analytics.active_endpoint(),
            Some("https://beacon.example/collect")
        );
        assert_eq!(
            cfg.directory.path,
            Some(PathBuf::from("/home/alice/roster.toml"))
        );
    }

    #[test]
    fn disabled_analytics_has_no_endpoint() {
        let cfg = AnalyticsConfig {
            enabled: false,
            endpoint: Some("https://beacon.example".into()),
        };
        assert!(cfg.active_endpoint().is_none());

        let cfg = AnalyticsConfig {
            enabled: true,
            endpoint: Some("  ".into()),
        };
        assert!(cfg.active_endpoint().is_none());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analytics]\nenabled = \"yes\"\n").expect("write");
        let err = load_user_config(&path).expect_err("invalid");
        assert!(matches!(err, CamekoError::ConfigParse { .. }));
    }

    #[test]
    fn state_dir_precedence() {
        let mut user = UserConfig::default();
        user.storage.dir = Some(PathBuf::from("/from/config"));

        assert_eq!(
            resolve_state_dir(Some(Path::new("/from/flag")), Some("/from/env"), &user),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_state_dir(None, Some("/from/env"), &user),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            resolve_state_dir(None, None, &user),
            PathBuf::from("/from/config")
        );
    }
}
