/// Server configuration
use crate::error::{Result, ServerError};
use cascade_catalog::CatalogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_web")]
    pub web: WebSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// Parser override; inferred from the file extension when unset
    #[serde(default)]
    pub format: Option<CatalogFormat>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSettings {
    /// Built web player assets
    #[serde(default = "default_web_dir")]
    pub dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `config.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables, e.g. CASCADE_CATALOG__PATH
        settings = settings.add_source(
            config::Environment::with_prefix("CASCADE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(ServerError::Config(format!(
                "Invalid listen address '{}'",
                self.server.host
            )));
        }

        if !self.catalog.path.is_file() {
            return Err(ServerError::Config(format!(
                "Catalog not found at {:?} (set CASCADE_CATALOG__PATH)",
                self.catalog.path
            )));
        }

        if self.catalog.format.is_none() && CatalogFormat::from_path(&self.catalog.path).is_none()
        {
            return Err(ServerError::Config(format!(
                "Cannot infer catalog format for {:?}, set catalog.format",
                self.catalog.path
            )));
        }

        if !self.web.dir.join("index.html").exists() {
            tracing::warn!(
                "No index.html in {:?}, the web player will not be served",
                self.web.dir
            );
        }

        Ok(())
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

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        path: default_catalog_path(),
        format: None,
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./data/songs.csv")
}

fn default_web() -> WebSettings {
    WebSettings {
        dir: default_web_dir(),
    }
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("./web")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            catalog: default_catalog(),
            web: default_web(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.catalog.path, PathBuf::from("./data/songs.csv"));
        assert!(config.catalog.format.is_none());
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[catalog]\npath = \"songs.dat\"\nformat = \"json\""
        )
        .unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.catalog.format, Some(CatalogFormat::Json));
        assert_eq!(config.web.dir, PathBuf::from("./web"));
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let result = ServerConfig::load(Some(Path::new("/nonexistent/cascade.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn validate_requires_catalog_file() {
        let mut config = ServerConfig::default();
        config.catalog.path = PathBuf::from("/nonexistent/songs.csv");
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn validate_requires_known_format() {
        let file = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
        let mut config = ServerConfig::default();
        config.catalog.path = file.path().to_path_buf();
        assert!(config.validate().is_err());

        config.catalog.format = Some(CatalogFormat::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_host() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let mut config = ServerConfig::default();
        config.catalog.path = file.path().to_path_buf();
        config.server.host = "not an address".to_string();
        assert!(config.validate().is_err());
    }
}
