//! Configuration system for docchat.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/docchat/config.toml` and/or `.docchat/config.toml`
//! in the working directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::SUPPORTED_EXTENSIONS;

/// Default address of the RAG service.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Shorthand environment variable for the service address.
pub const API_BASE_ENV: &str = "DOCCHAT_API_BASE";

/// Top-level configuration for docchat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocChatConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Connection settings for the RAG service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the service, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme name ("dark" or "light").
    pub theme: String,
    /// Whether to use the TUI (false = simple REPL).
    pub use_tui: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            use_tui: true,
        }
    }
}

/// Upload form configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Extensions the picker advertises. Other files still upload, with a warning.
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl UploadConfig {
    /// Whether a file name carries one of the accepted extensions.
    pub fn accepts(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .map(|ext| {
                self.accepted_extensions
                    .iter()
                    .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}

impl DocChatConfig {
    /// Validate this config and return any warnings.
    ///
    /// Returns an empty Vec if the config is valid. Warnings never fail loading.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            warnings.push(format!(
                "api.base_url ({}) does not start with http:// or https://",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0; requests will fail immediately".to_string());
        }
        if !matches!(self.ui.theme.as_str(), "dark" | "light") {
            warnings.push(format!(
                "ui.theme ({}) is unknown; falling back to dark",
                self.ui.theme
            ));
        }
        warnings
    }
}

/// Values supplied on the command line. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub use_tui: Option<bool>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut DocChatConfig) {
        if let Some(base) = &self.api_base {
            config.api.base_url = base.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.api.timeout_secs = timeout;
        }
        if let Some(use_tui) = self.use_tui {
            config.ui.use_tui = use_tui;
        }
    }
}

/// Path of the user-level config file, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "docchat", "docchat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".docchat").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (`DOCCHAT_API__BASE_URL`, then the `DOCCHAT_API_BASE` shorthand)
/// 3. Workspace-local config (`.docchat/config.toml`)
/// 4. User config (`~/.config/docchat/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ConfigOverrides>,
) -> Result<DocChatConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(DocChatConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    figment = figment
        .merge(
            Env::raw()
                .only(&[API_BASE_ENV])
                .map(|_| "api.base_url".into()),
        )
        .merge(Env::prefixed("DOCCHAT_").split("__"));

    let mut config: DocChatConfig = figment.extract()?;
    if let Some(overrides) = overrides {
        overrides.apply(&mut config);
    }
    Ok(config)
}

/// Write the default configuration to `.docchat/config.toml` unless one exists.
///
/// Returns the path to the config file.
pub fn init_workspace_config(workspace: &Path) -> Result<PathBuf, ConfigError> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        return Err(ConfigError::Invalid {
            message: format!("{} already exists", path.display()),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Invalid {
            message: format!("cannot create {}: {e}", parent.display()),
        })?;
    }
    let toml_str =
        toml::to_string_pretty(&DocChatConfig::default()).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
    std::fs::write(&path, toml_str).map_err(|e| ConfigError::Invalid {
        message: format!("cannot write {}: {e}", path.display()),
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = DocChatConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 120);
        assert_eq!(config.ui.theme, "dark");
        assert!(config.upload.accepts("report.pdf"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_endpoint_strips_slashes() {
        let api = ApiConfig {
            base_url: "http://rag.local:9000/".into(),
            timeout_secs: 5,
        };
        assert_eq!(
            api.endpoint("/document/upload"),
            "http://rag.local:9000/document/upload"
        );
        assert_eq!(api.endpoint("chat/query"), "http://rag.local:9000/chat/query");
    }

    #[test]
    fn test_accepts_is_case_insensitive() {
        let upload = UploadConfig::default();
        assert!(upload.accepts("NOTES.MD"));
        assert!(!upload.accepts("image.png"));
        assert!(!upload.accepts("Makefile"));
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut config = DocChatConfig::default();
        config.api.base_url = "localhost:8000".into();
        config.api.timeout_secs = 0;
        config.ui.theme = "neon".into();
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = DocChatConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: DocChatConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.upload.accepted_extensions, config.upload.accepted_extensions);
    }

    #[test]
    fn test_load_config_from_workspace() {
        Jail::expect_with(|jail| {
            jail.create_dir(".docchat")?;
            jail.create_file(
                ".docchat/config.toml",
                r#"
[api]
base_url = "http://rag.internal:8080"
timeout_secs = 30

[ui]
theme = "light"
use_tui = false
"#,
            )?;
            let config = load_config(Some(jail.directory()), None).unwrap();
            assert_eq!(config.api.base_url, "http://rag.internal:8080");
            assert_eq!(config.api.timeout_secs, 30);
            assert_eq!(config.ui.theme, "light");
            assert!(!config.ui.use_tui);
            Ok(())
        });
    }

    #[test]
    fn test_env_shorthand_and_nested_override() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCCHAT_API_BASE", "http://short:1");
            let config = load_config(None, None).unwrap();
            assert_eq!(config.api.base_url, "http://short:1");

            jail.set_env("DOCCHAT_API__BASE_URL", "http://nested:2");
            let config = load_config(None, None).unwrap();
            assert_eq!(config.api.base_url, "http://nested:2");
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides_win() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCCHAT_API_BASE", "http://env:1");
            let overrides = ConfigOverrides {
                api_base: Some("http://flag:3".into()),
                timeout_secs: Some(7),
                use_tui: Some(false),
            };
            let config = load_config(None, Some(&overrides)).unwrap();
            assert_eq!(config.api.base_url, "http://flag:3");
            assert_eq!(config.api.timeout_secs, 7);
            assert!(!config.ui.use_tui);
            Ok(())
        });
    }

    #[test]
    fn test_init_workspace_config_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_workspace_config(dir.path()).unwrap();
        assert!(path.ends_with(".docchat/config.toml"));
        let parsed: DocChatConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.api.base_url, DEFAULT_API_BASE);
        assert!(init_workspace_config(dir.path()).is_err());
    }
}
