use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::constants::{DEFAULT_DATE_CLASS, DEFAULT_GRAPH_URL, DEFAULT_POSTS_TO_FETCH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where a widget gets its access token from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// A pre-generated access token.
    Static(String),
    /// URL of an endpoint returning `{"access_token": "..."}`.
    Generator(String),
}

/// Settings for one feed widget. Immutable once built and passed by
/// reference into every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Identifier used in routes and logs. Defaults to the page name.
    pub name: String,
    /// Facebook page whose feed is shown.
    pub page_name: String,
    pub token: TokenSource,
    pub posts_to_fetch: u32,
    /// CSS class of the `<span>` wrapping the date link.
    pub date_class: String,
}

impl WidgetConfig {
    /// Create a widget with the default post count and date class.
    #[must_use]
    pub fn new(page_name: impl Into<String>, token: TokenSource) -> Self {
        let page_name = page_name.into();
        Self {
            name: page_name.clone(),
            page_name,
            token,
            posts_to_fetch: DEFAULT_POSTS_TO_FETCH,
            date_class: DEFAULT_DATE_CLASS.to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_posts_to_fetch(mut self, posts_to_fetch: u32) -> Self {
        self.posts_to_fetch = posts_to_fetch;
        self
    }

    #[must_use]
    pub fn with_date_class(mut self, date_class: impl Into<String>) -> Self {
        self.date_class = date_class.into();
        self
    }
}

/// Application configuration loaded from environment variables and an
/// optional TOML targets file.
#[derive(Debug, Clone)]
pub struct Config {
    // Graph API
    pub graph_url: String,
    pub http_timeout: Duration,

    // Widgets
    pub targets: Vec<WidgetConfig>,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// When `FACEFEED_TARGETS_FILE` is set the widgets come from that file;
    /// otherwise a single widget is built from the `FACEFEED_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let targets = match optional_env("FACEFEED_TARGETS_FILE") {
            Some(path) => load_targets_file(Path::new(&path))?,
            None => vec![widget_from_env()?],
        };

        Ok(Self {
            // Graph API
            graph_url: env_or_default("FACEFEED_GRAPH_URL", DEFAULT_GRAPH_URL),
            http_timeout: Duration::from_secs(parse_env_u64("FACEFEED_HTTP_TIMEOUT_SECS", 30)?),

            // Widgets
            targets,

            // Web Server
            web_host: env_or_default("WEB_HOST", "127.0.0.1"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Configuration with defaults and no widgets, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            http_timeout: Duration::from_secs(5),
            targets: Vec::new(),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }

    /// Look up a widget by name.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&WidgetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Validate that the configuration is usable.
    ///
    /// Page names are deliberately not checked; a bad one is rejected by the
    /// Graph API itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.graph_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "FACEFEED_GRAPH_URL".to_string(),
                message: format!("'{}' is not an absolute URL", self.graph_url),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "FACEFEED_HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "FACEFEED_TARGETS_FILE".to_string(),
                message: "no targets configured".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    name: "target.name".to_string(),
                    message: format!("duplicate target '{}'", target.name),
                });
            }
            if let TokenSource::Generator(url) = &target.token {
                if Url::parse(url).is_err() {
                    return Err(ConfigError::InvalidValue {
                        name: format!("{}.token_generator", target.name),
                        message: format!("'{url}' is not an absolute URL"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// One `[[target]]` table in the targets file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetEntry {
    name: Option<String>,
    page_name: String,
    access_token: Option<String>,
    token_generator: Option<String>,
    posts_to_fetch: Option<u32>,
    date_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TargetsFile {
    #[serde(default, rename = "target")]
    targets: Vec<TargetEntry>,
}

impl From<TargetEntry> for WidgetConfig {
    fn from(entry: TargetEntry) -> Self {
        let token = token_source(entry.token_generator, entry.access_token);
        let mut widget = WidgetConfig::new(entry.page_name, token);
        if let Some(name) = entry.name {
            widget.name = name;
        }
        if let Some(n) = entry.posts_to_fetch {
            widget.posts_to_fetch = n;
        }
        if let Some(class) = entry.date_class {
            widget.date_class = class;
        }
        widget
    }
}

/// Parse widgets from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid targets document.
pub fn parse_targets(text: &str, path: &Path) -> Result<Vec<WidgetConfig>, ConfigError> {
    let file: TargetsFile = toml::from_str(text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.targets.into_iter().map(WidgetConfig::from).collect())
}

/// Read and parse a TOML targets file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_targets_file(path: &Path) -> Result<Vec<WidgetConfig>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_targets(&text, path)
}

fn widget_from_env() -> Result<WidgetConfig, ConfigError> {
    let page_name = required_env("FACEFEED_PAGE_NAME")?;
    let token = token_source(
        optional_env("FACEFEED_TOKEN_GENERATOR"),
        optional_env("FACEFEED_ACCESS_TOKEN"),
    );

    Ok(WidgetConfig::new(page_name, token)
        .with_posts_to_fetch(parse_env_u32(
            "FACEFEED_POSTS_TO_FETCH",
            DEFAULT_POSTS_TO_FETCH,
        )?)
        .with_date_class(env_or_default("FACEFEED_DATE_CLASS", DEFAULT_DATE_CLASS)))
}

/// A token generator wins over a static token; with neither, an empty token
/// is sent and the API rejects the request.
fn token_source(generator: Option<String>, access_token: Option<String>) -> TokenSource {
    match generator.filter(|g| !g.is_empty()) {
        Some(url) => TokenSource::Generator(url),
        None => TokenSource::Static(access_token.unwrap_or_default()),
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
