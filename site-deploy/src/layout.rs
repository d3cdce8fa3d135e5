//! Host paths used by one project deployment.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::SiteConfig;
use crate::environment::{ConfigVariant, Environment};
use crate::project::ProjectName;

/// Every path a project deployment touches on an app host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteLayout {
    pub project: ProjectName,
    pub environment: Environment,
    /// Host name the active virtual host answers on
    pub server_name: String,
    pub home: PathBuf,
    pub ssh: PathBuf,
    pub sites: PathBuf,
    pub logs: PathBuf,
    pub project_dir: PathBuf,
    pub conf: PathBuf,
    /// `conf/<env>`
    pub env_conf: PathBuf,
    pub virtualenvs: PathBuf,
    pub virtualenv: PathBuf,
    pub activate: PathBuf,
    pub apache_dir: PathBuf,
    /// Symlink Apache includes; points at one of the config variants
    pub apache_link: PathBuf,
    pub wsgi_script: PathBuf,
    /// Django settings module receiving the generated secret key
    pub site_settings: PathBuf,
}

impl SiteLayout {
    pub fn new(config: &SiteConfig, project: ProjectName, environment: Environment) -> Self {
        let home = config.home();
        let sites = home.join(&config.sites_dirname);
        let project_dir = sites.join(project.as_str());
        let conf = project_dir.join(&config.conf_dirname);
        let env_conf = conf.join(environment.as_dir());
        let virtualenvs = home.join(&config.env_dirname);
        let virtualenv = virtualenvs.join(project.as_str());
        let apache_dir = home.join(&config.apache_dirname);

        Self {
            server_name: format!("{}.{}", project, environment.domain_suffix()),
            ssh: home.join(&config.ssh_dirname),
            logs: home.join(&config.log_dirname).join(project.as_str()),
            activate: virtualenv.join("bin").join("activate"),
            apache_link: apache_dir.join(project.as_str()),
            wsgi_script: env_conf.join("wsgi.py"),
            site_settings: project_dir.join("core").join("settings").join("site.py"),
            home,
            sites,
            project_dir,
            conf,
            env_conf,
            virtualenvs,
            virtualenv,
            apache_dir,
            project,
            environment,
        }
    }

    /// `conf/<env>/apache` or `conf/<env>/apache.maintenance`
    pub fn config_file(&self, variant: ConfigVariant) -> PathBuf {
        self.env_conf.join(variant.file_name())
    }

    /// Name/path pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("home", self.home.clone()),
            ("ssh", self.ssh.clone()),
            ("sites", self.sites.clone()),
            ("logs", self.logs.clone()),
            ("project", self.project_dir.clone()),
            ("conf", self.conf.clone()),
            ("env_conf", self.env_conf.clone()),
            ("apache_conf", self.config_file(ConfigVariant::Active)),
            ("apache_maintenance_conf", self.config_file(ConfigVariant::Maintenance)),
            ("wsgi_script", self.wsgi_script.clone()),
            ("virtualenvs", self.virtualenvs.clone()),
            ("virtualenv", self.virtualenv.clone()),
            ("activate", self.activate.clone()),
            ("apache_dir", self.apache_dir.clone()),
            ("apache_link", self.apache_link.clone()),
            ("site_settings", self.site_settings.clone()),
        ]
    }
}
