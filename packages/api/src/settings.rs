//! Server settings, layered from defaults, an optional `config.toml` and `NOTES_*`
//! environment variables (`NOTES_BACKEND__URL`, `NOTES_BACKEND__ANON_KEY`, ...).
//! A `.env` file is read first when present.

use std::sync::Arc;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use store::{MemoryBackend, SharedBackend, SupabaseBackend};

use crate::context::AppContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Supabase,
    /// In-process backend, for local development without a hosted project.
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct App {
    /// Public origin of the app, used to build the email-confirmation link.
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub app: App,
    pub session: SessionSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("backend.kind", "supabase")?
            .set_default("backend.url", "")?
            .set_default("backend.anon_key", "")?
            .set_default("app.url", "http://localhost:8080")?
            .set_default("session.secure", false)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("NOTES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn email_redirect_url(&self) -> String {
        store::auth::email_redirect_url(&self.app.url)
    }

    /// The backend named by `backend.kind`.
    pub fn build_backend(&self) -> Result<SharedBackend, ConfigError> {
        match self.backend.kind {
            BackendKind::Supabase => {
                if self.backend.url.trim().is_empty() {
                    return Err(ConfigError::NotFound("backend.url".to_string()));
                }
                if self.backend.anon_key.trim().is_empty() {
                    return Err(ConfigError::NotFound("backend.anon_key".to_string()));
                }
                Ok(Arc::new(SupabaseBackend::new(
                    self.backend.url.as_str(),
                    self.backend.anon_key.as_str(),
                )))
            }
            BackendKind::Memory => {
                tracing::warn!("using in-memory backend; accounts and notes are not persisted");
                Ok(Arc::new(MemoryBackend::with_auto_confirm()))
            }
        }
    }

    pub fn app_context(&self) -> Result<AppContext, ConfigError> {
        Ok(AppContext::new(self.build_backend()?, self.email_redirect_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_settings() {
        set_var("NOTES_BACKEND__KIND", "memory");
        set_var("NOTES_APP__URL", "https://notes.example.com/");
        let settings = Settings::new().unwrap_or_default();
        println!("Settings = {:?}", settings);
        assert_eq!(settings.backend.kind, BackendKind::Memory);
        assert_eq!(
            settings.email_redirect_url(),
            "https://notes.example.com/auth/callback"
        );
        assert!(settings.app_context().is_ok());
    }

    #[test]
    fn supabase_requires_url_and_key() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.build_backend(),
            Err(ConfigError::NotFound(key)) if key == "backend.url"
        ));

        settings.backend.url = "https://abc.supabase.co".to_string();
        assert!(matches!(
            settings.build_backend(),
            Err(ConfigError::NotFound(key)) if key == "backend.anon_key"
        ));

        settings.backend.anon_key = "anon".to_string();
        assert!(settings.build_backend().is_ok());
    }
}
