// Site configuration (defaults, optional file, SITECTL_* environment)
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

/// Prefix for environment overrides, e.g. `SITECTL_APP_USER`
pub const ENV_PREFIX: &str = "SITECTL_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Parent of the app user's home directory
    pub users_home: PathBuf,
    /// Account that owns deployed sites
    pub app_user: String,
    pub ssh_dirname: String,
    pub sites_dirname: String,
    pub log_dirname: String,
    /// Virtualenvs live here
    pub env_dirname: String,
    /// Inside each project; holds `stg/` and `prd/`
    pub conf_dirname: String,
    /// Directory of per-project links Apache includes
    pub apache_dirname: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            users_home: PathBuf::from("/home"),
            app_user: "apps".to_string(),
            ssh_dirname: ".ssh".to_string(),
            sites_dirname: "sites".to_string(),
            log_dirname: "log".to_string(),
            env_dirname: "env".to_string(),
            conf_dirname: "conf".to_string(),
            apache_dirname: "apache".to_string(),
        }
    }
}

impl SiteConfig {
    /// Layered sources: defaults, then `path` (TOML or YAML), then
    /// `SITECTL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if `path` is given but missing or has an unknown extension.
    pub fn figment(path: Option<&Path>) -> DeployResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(SiteConfig::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(DeployError::Configuration(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                _ => {
                    return Err(DeployError::Configuration(format!(
                        "unsupported config format: {}",
                        path.display()
                    )))
                }
            };
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// # Errors
    ///
    /// See [`SiteConfig::figment`]; also fails when a value has the wrong type.
    pub fn load(path: Option<&Path>) -> DeployResult<Self> {
        let config: SiteConfig = Self::figment(path)?
            .extract()
            .map_err(|e| DeployError::Configuration(e.to_string()))?;
        config.validate()?;

        tracing::debug!(
            users_home = %config.users_home.display(),
            app_user = %config.app_user,
            "Site configuration loaded"
        );
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`DeployError::Configuration`] if the app user or a directory
    /// name is empty or contains a path separator.
    pub fn validate(&self) -> DeployResult<()> {
        let names = [
            ("app_user", &self.app_user),
            ("ssh_dirname", &self.ssh_dirname),
            ("sites_dirname", &self.sites_dirname),
            ("log_dirname", &self.log_dirname),
            ("env_dirname", &self.env_dirname),
            ("conf_dirname", &self.conf_dirname),
            ("apache_dirname", &self.apache_dirname),
        ];
        for (field, value) in names {
            if value.is_empty() || value.contains('/') {
                return Err(DeployError::Configuration(format!(
                    "{field} must be a single non-empty path component, got `{value}`"
                )));
            }
        }
        Ok(())
    }

    /// `<users_home>/<app_user>`
    pub fn home(&self) -> PathBuf {
        self.users_home.join(&self.app_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.home(), PathBuf::from("/home/apps"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file("sitectl.toml", "app_user = \"deploy\"\nsites_dirname = \"www\"\n")?;
            jail.set_env("SITECTL_SITES_DIRNAME", "srv");

            let config = SiteConfig::load(Some(Path::new("sitectl.toml"))).unwrap();
            assert_eq!(config.app_user, "deploy");
            assert_eq!(config.sites_dirname, "srv");
            assert_eq!(config.log_dirname, "log");
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("sitectl.yaml", "users_home: /srv/home\n")?;
            let config = SiteConfig::load(Some(Path::new("sitectl.yaml"))).unwrap();
            assert_eq!(config.home(), PathBuf::from("/srv/home/apps"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_and_invalid_files() {
        Jail::expect_with(|jail| {
            jail.create_file("sitectl.ini", "app_user=x")?;
            jail.create_file("bad.toml", "app_user = \"a/b\"")?;

            assert!(SiteConfig::load(Some(Path::new("nope.toml"))).is_err());
            assert!(SiteConfig::load(Some(Path::new("sitectl.ini"))).is_err());
            assert!(matches!(
                SiteConfig::load(Some(Path::new("bad.toml"))),
                Err(DeployError::Configuration(_))
            ));
            Ok(())
        });
    }
}
