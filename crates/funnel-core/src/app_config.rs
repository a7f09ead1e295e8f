use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

#[derive(Clone)]
pub struct AppConfig {
    pub bot_token: Option<String>,
    pub users_path: PathBuf,
    pub output_dir: PathBuf,
    pub profiles_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub assets_root: PathBuf,
    pub send_delay_ms: u64,
    pub log_level: String,
    pub telegram_api_url: String,
    pub request_timeout_secs: u64,
    pub browser_path: Option<PathBuf>,
}

impl AppConfig {
    /// Returns the bot token, or `MissingEnvVar("BOT_TOKEN")` when it was not set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `BOT_TOKEN` is absent or blank.
    pub fn require_bot_token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("BOT_TOKEN".to_string()))
    }

    #[must_use]
    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[redacted]"))
            .field("users_path", &self.users_path)
            .field("output_dir", &self.output_dir)
            .field("profiles_dir", &self.profiles_dir)
            .field("templates_dir", &self.templates_dir)
            .field("assets_root", &self.assets_root)
            .field("send_delay_ms", &self.send_delay_ms)
            .field("log_level", &self.log_level)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("browser_path", &self.browser_path)
            .finish()
    }
}
