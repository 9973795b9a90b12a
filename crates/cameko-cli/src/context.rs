//! Wiring from the resolved config to a ready [`FormController`].

use crate::analytics::HttpBeacon;
use crate::output::{CliError, OutputMode, report_error};
use anyhow::Result;
use cameko_core::analytics::{AnalyticsSink, NoopSink};
use cameko_core::config::{EffectiveConfig, UserConfig, resolve_config};
use cameko_core::directory::Directory;
use cameko_core::FormController;
use cameko_core::store::JsonFileStore;
use std::path::Path;

pub type Controller = FormController<JsonFileStore, Box<dyn AnalyticsSink>>;

/// One CLI invocation's view of config, roster and saved form.
pub struct Session {
    pub config: EffectiveConfig,
    pub controller: Controller,
}

impl Session {
    /// Resolve config and load the saved form.
    ///
    /// # Errors
    ///
    /// Fails when the config file or the custom roster cannot be parsed. A
    /// broken saved form is not an error; it falls back to defaults.
    pub fn open(output: OutputMode, state_dir: Option<&Path>) -> Result<Self> {
        let config =
            resolve_config(state_dir).map_err(|e| report_error(output, CliError::from(&e)))?;
        let directory =
            load_directory(&config.user).map_err(|e| report_error(output, CliError::from(&e)))?;

        tracing::debug!(
            state_dir = %config.state_dir.display(),
            groups = directory.groups().len(),
            "opening form"
        );

        let store = JsonFileStore::new(&config.state_dir);
        let sink = analytics_sink(&config.user);
        let controller = FormController::open(store, directory, sink);
        Ok(Self { config, controller })
    }

    /// Base URL of the compose page.
    pub fn compose_base(&self) -> &str {
        &self.config.user.compose.base_url
    }
}

fn load_directory(user: &UserConfig) -> Result<Directory, cameko_core::error::CamekoError> {
    match &user.directory.path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading custom roster");
            Directory::load(path)
        }
        None => Ok(Directory::builtin()),
    }
}

fn analytics_sink(user: &UserConfig) -> Box<dyn AnalyticsSink> {
    match user.analytics.active_endpoint() {
        Some(endpoint) => Box::new(HttpBeacon::new(endpoint)),
        None => Box::new(NoopSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_without_custom_path() {
        let dir = load_directory(&UserConfig::default()).expect("builtin");
        assert_eq!(dir, Directory::builtin());
    }

    #[test]
    fn custom_roster_is_loaded() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("roster.toml");
        std::fs::write(
            &path,
            "[[groups]]\nname = \"テスト\"\n\n[[groups.members]]\nname = \"山田 花子\"\naccount = \"hanako\"\n",
        )
        .expect("write roster");

        let mut user = UserConfig::default();
        user.directory.path = Some(path);
        let dir = load_directory(&user).expect("load");
        assert_eq!(dir.group_names().collect::<Vec<_>>(), ["テスト"]);
        assert_eq!(
            dir.member("テスト", "山田 花子").map(|m| m.account.as_str()),
            Some("hanako")
        );
    }

    #[test]
    fn broken_roster_is_an_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("roster.toml");
        std::fs::write(&path, "[[groups]\n").expect("write roster");

        let mut user = UserConfig::default();
        user.directory.path = Some(path);
        let err = load_directory(&user).expect_err("parse error");
        assert_eq!(err.error_code().code(), "E1002");
    }
}
