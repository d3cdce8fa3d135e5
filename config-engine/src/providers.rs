// Render-context providers (explicit pairs, files, environment)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Default prefix for template variables taken from the environment
pub const DEFAULT_ENV_PREFIX: &str = "SITECTL_VAR_";

/// Variable values available to a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    values: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of this context; its values win.
    pub fn merge(&mut self, other: RenderContext) {
        self.values.extend(other.values);
    }

    /// Parse a single `KEY=VALUE` entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEntry`] when there is no `=` or the key
    /// is blank.
    pub fn parse_entry(entry: &str) -> Result<(String, String)> {
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(ConfigError::InvalidEntry(entry.to_string())),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

/// Source of template variables
pub trait ContextProvider {
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or holds values that
    /// are not scalars.
    fn load(&self) -> Result<RenderContext>;
}

/// Explicit `KEY=VALUE` entries, e.g. from the command line
#[derive(Debug, Clone, Default)]
pub struct PairsProvider {
    entries: Vec<String>,
}

impl PairsProvider {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

impl ContextProvider for PairsProvider {
    fn load(&self) -> Result<RenderContext> {
        self.entries
            .iter()
            .map(|entry| RenderContext::parse_entry(entry))
            .collect()
    }
}

/// YAML, TOML or JSON file of scalar values, chosen by extension
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ContextProvider for FileProvider {
    fn load(&self) -> Result<RenderContext> {
        if !self.path.is_file() {
            return Err(ConfigError::SourceNotFound(self.path.display().to_string()));
        }

        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let figment = match extension.as_str() {
            "yaml" | "yml" => Figment::from(Yaml::file(&self.path)),
            "toml" => Figment::from(Toml::file(&self.path)),
            "json" => Figment::from(Json::file(&self.path)),
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    self.path.display().to_string(),
                ))
            }
        };

        tracing::debug!(path = %self.path.display(), "Loading template variables from file");
        extract_scalars(&figment)
    }
}

/// Environment variables sharing a prefix; keys are lowercased with the
/// prefix removed.
#[derive(Debug, Clone)]
pub struct EnvProvider {
    prefix: String,
}

impl EnvProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl ContextProvider for EnvProvider {
    // Raw strings: typed parsing would turn `007` into `7`
    fn load(&self) -> Result<RenderContext> {
        Ok(Env::prefixed(&self.prefix)
            .iter()
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
            .collect())
    }
}

/// Providers applied in order; later providers override earlier ones.
#[derive(Default)]
pub struct LayeredContext {
    providers: Vec<Box<dyn ContextProvider>>,
}

impl LayeredContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_source<P: ContextProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl ContextProvider for LayeredContext {
    fn load(&self) -> Result<RenderContext> {
        let mut context = RenderContext::new();
        for provider in &self.providers {
            context.merge(provider.load()?);
        }
        Ok(context)
    }
}

fn extract_scalars(figment: &Figment) -> Result<RenderContext> {
    let raw: BTreeMap<String, Value> = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    raw.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(ConfigError::InvalidEntry(key)),
            };
            Ok((key, text))
        })
        .collect()
}
