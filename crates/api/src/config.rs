use std::env;

use thiserror::Error;
use url::Url;

/// Environment variable naming the main backend (auth + entries).
pub const BACKEND_MAIN_VAR: &str = "SIGHTREAD_BACKEND_MAIN";

/// Environment variable naming the music-generation backend.
pub const BACKEND_MUSIC_VAR: &str = "SIGHTREAD_BACKEND_MUSIC";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{name} is not set")]
    MissingVar { name: &'static str },

    #[error("{name} is not a valid URL: {raw}")]
    InvalidUrl { name: &'static str, raw: String },
}

/// Base URLs of both remote collaborators.
///
/// Both must be present and well-formed at startup; there is no useful
/// degraded mode without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    main_url: Url,
    music_url: Url,
}

impl BackendConfig {
    /// Build a config from explicit URL strings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for unparseable URLs.
    pub fn from_parts(main: &str, music: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            main_url: parse_base_url(BACKEND_MAIN_VAR, main)?,
            music_url: parse_base_url(BACKEND_MUSIC_VAR, music)?,
        })
    }

    /// Read both backend URLs from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` or `ConfigError::InvalidUrl`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let main = env::var(BACKEND_MAIN_VAR).map_err(|_| ConfigError::MissingVar {
            name: BACKEND_MAIN_VAR,
        })?;
        let music = env::var(BACKEND_MUSIC_VAR).map_err(|_| ConfigError::MissingVar {
            name: BACKEND_MUSIC_VAR,
        })?;
        Self::from_parts(&main, &music)
    }

    #[must_use]
    pub fn main_url(&self) -> &Url {
        &self.main_url
    }

    #[must_use]
    pub fn music_url(&self) -> &Url {
        &self.music_url
    }

    /// Join a path onto the main backend base URL.
    #[must_use]
    pub fn main_endpoint(&self, path: &str) -> Url {
        join_endpoint(&self.main_url, path)
    }

    /// Join a path onto the music backend base URL.
    #[must_use]
    pub fn music_endpoint(&self, path: &str) -> Url {
        join_endpoint(&self.music_url, path)
    }
}

fn parse_base_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingVar { name });
    }
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl {
        name,
        raw: trimmed.to_string(),
    })?;
    if !url.has_host() {
        return Err(ConfigError::InvalidUrl {
            name,
            raw: trimmed.to_string(),
        });
    }
    Ok(url)
}

fn join_endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    {
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{trimmed}/{}", path.trim_start_matches('/')));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_joins() {
        let config =
            BackendConfig::from_parts("http://127.0.0.1:5000/", "http://127.0.0.1:8000").unwrap();
        assert_eq!(
            config.main_endpoint("api/note-game/entry").as_str(),
            "http://127.0.0.1:5000/api/note-game/entry"
        );
        assert_eq!(
            config.music_endpoint("/note-game").as_str(),
            "http://127.0.0.1:8000/note-game"
        );
    }

    #[test]
    fn rejects_bad_urls() {
        let err = BackendConfig::from_parts("not a url", "http://ok:8000").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = BackendConfig::from_parts("", "http://ok:8000").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { .. }));
    }
}
