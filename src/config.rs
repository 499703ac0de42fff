use crate::error::AppError;

const API_BASE_VAR: &str = "PIXVAULT_API_BASE";
const MEDIA_BASE_VAR: &str = "PIXVAULT_MEDIA_BASE";
const USER_ID_VAR: &str = "PIXVAULT_USER_ID";

#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub api_base: String,
    pub media_base: Option<String>,
    pub user_id: String,
}

impl VaultConfig {
    pub fn new(api_base: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            api_base: normalize_base(api_base.into()),
            media_base: None,
            user_id: user_id.into(),
        }
    }

    pub fn with_media_base(mut self, media_base: impl Into<String>) -> Self {
        self.media_base = Some(normalize_base(media_base.into()));
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        let api_base = require_env(API_BASE_VAR)?;
        let user_id = require_env(USER_ID_VAR)?;
        let mut config = Self::new(api_base, user_id);
        if let Some(media_base) = std::env::var(MEDIA_BASE_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config = config.with_media_base(media_base);
        }
        Ok(config)
    }
}

fn require_env(key: &str) -> Result<String, AppError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::General(format!("missing environment variable: {key}")))
}

fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(normalize_base("https://api.test/".to_string()), "https://api.test");
        assert_eq!(normalize_base("https://api.test///".to_string()), "https://api.test");
        assert_eq!(normalize_base("https://api.test".to_string()), "https://api.test");
    }

    #[test]
    fn builder_normalizes_both_bases() {
        let config = VaultConfig::new("https://api.test/", "user-1")
            .with_media_base("https://media.test/acct/");
        assert_eq!(config.api_base, "https://api.test");
        assert_eq!(config.media_base.as_deref(), Some("https://media.test/acct"));
        assert_eq!(config.user_id, "user-1");
    }

    #[test]
    fn from_env_reads_and_requires_variables() {
        std::env::set_var(API_BASE_VAR, "https://api.test/");
        std::env::set_var(MEDIA_BASE_VAR, "");
        std::env::set_var(USER_ID_VAR, "user-env");

        let config = VaultConfig::from_env().unwrap();
        assert_eq!(config.api_base, "https://api.test");
        assert_eq!(config.media_base, None);
        assert_eq!(config.user_id, "user-env");

        std::env::remove_var(USER_ID_VAR);
        assert!(VaultConfig::from_env().is_err());

        std::env::remove_var(API_BASE_VAR);
        std::env::remove_var(MEDIA_BASE_VAR);
    }
}
