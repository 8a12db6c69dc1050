/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "drift.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Directory holding the audio files
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    /// Audio extension listed by the catalog, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// URL prefix media files are served under
    #[serde(default = "default_media_prefix")]
    pub media_prefix: String,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `path` (or `drift.toml` when present), then applies
    /// `DRIFT_`-prefixed variables, e.g. `DRIFT_LIBRARY__MUSIC_DIR`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DRIFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let mut config: Self = config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        config.normalize();
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.extension.is_empty() {
            return Err(ServerError::Config(
                "Audio extension is required (set DRIFT_LIBRARY__EXTENSION)".to_string(),
            ));
        }

        if self.library.media_prefix.trim_matches('/').is_empty() {
            return Err(ServerError::Config(
                "Media prefix must name a path segment, e.g. /music".to_string(),
            ));
        }

        if self.library.media_prefix.starts_with("/api") {
            return Err(ServerError::Config(format!(
                "Media prefix {} collides with the API routes",
                self.library.media_prefix
            )));
        }

        Ok(())
    }

    /// Strip the extension's dot and give the prefix exactly one leading slash
    fn normalize(&mut self) {
        self.library.extension = self.library.extension.trim_start_matches('.').to_string();
        self.library.media_prefix = format!("/{}", self.library.media_prefix.trim_matches('/'));
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        music_dir: default_music_dir(),
        extension: default_extension(),
        media_prefix: default_media_prefix(),
    }
}

fn default_music_dir() -> PathBuf {
    PathBuf::from("./music")
}

fn default_extension() -> String {
    "mp3".to_string()
}

fn default_media_prefix() -> String {
    "/music".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            library: default_library(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.library.extension, "mp3");
        assert_eq!(config.library.media_prefix, "/music");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_file_and_normalizes() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[library]\nmusic_dir = \"/srv/tracks\"\nextension = \".ogg\"\nmedia_prefix = \"media/\""
        )
        .unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.library.music_dir, PathBuf::from("/srv/tracks"));
        assert_eq!(config.library.extension, "ogg");
        assert_eq!(config.library.media_prefix, "/media");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = ServerConfig::load(Some(Path::new("/nonexistent/drift.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn empty_extension_is_rejected() {
        let mut config = ServerConfig::default();
        config.library.extension = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn root_or_api_prefix_is_rejected() {
        let mut config = ServerConfig::default();
        config.library.media_prefix = "/".to_string();
        assert!(config.validate().is_err());

        config.library.media_prefix = "/api/files".to_string();
        assert!(config.validate().is_err());
    }
}
