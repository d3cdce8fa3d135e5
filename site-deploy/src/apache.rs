//! Writing rendered Apache configs and switching the active one.
//!
//! Apache includes `<home>/apache/<project>`, a symlink to either
//! `conf/<env>/apache` or `conf/<env>/apache.maintenance`. Switching
//! maintenance mode on or off only swaps that link.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::environment::ConfigVariant;
use crate::error::{DeployError, DeployResult};
use crate::layout::SiteLayout;
use crate::vhost::render_vhost;

/// Result of a link request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link now points at `target`
    Linked { link: PathBuf, target: PathBuf },
    /// The config file for the variant does not exist; nothing changed
    Skipped { missing: PathBuf },
}

/// Render both variants for the layout's environment and write them under
/// `conf/<env>/`.
///
/// # Errors
///
/// Fails on rendering errors or if a directory or file cannot be written.
pub async fn write_configs(layout: &SiteLayout) -> DeployResult<Vec<PathBuf>> {
    fs::create_dir_all(&layout.env_conf)
        .await
        .map_err(|e| DeployError::io(&layout.env_conf, e))?;

    let mut written = Vec::with_capacity(ConfigVariant::ALL.len());
    for variant in ConfigVariant::ALL {
        let rendered = render_vhost(layout.environment, variant, &layout.project)?;
        let path = layout.config_file(variant);
        fs::write(&path, rendered)
            .await
            .map_err(|e| DeployError::io(&path, e))?;

        info!(path = %path.display(), variant = %variant, "Wrote Apache config");
        written.push(path);
    }
    Ok(written)
}

/// Point the Apache link at `variant`'s config file.
///
/// Does nothing when the config file is missing.
///
/// # Errors
///
/// Fails if the link directory cannot be created or the old link cannot be
/// replaced.
pub async fn link_config(layout: &SiteLayout, variant: ConfigVariant) -> DeployResult<LinkOutcome> {
    let target = layout.config_file(variant);
    if !path_exists(&target).await? {
        warn!(path = %target.display(), "Apache config missing, link left unchanged");
        return Ok(LinkOutcome::Skipped { missing: target });
    }

    fs::create_dir_all(&layout.apache_dir)
        .await
        .map_err(|e| DeployError::io(&layout.apache_dir, e))?;

    remove_link(&layout.apache_link).await?;
    symlink(&target, &layout.apache_link).await?;

    info!(
        link = %layout.apache_link.display(),
        target = %target.display(),
        variant = %variant,
        "Linked Apache config"
    );
    Ok(LinkOutcome::Linked {
        link: layout.apache_link.clone(),
        target,
    })
}

/// Switch the site to the maintenance page.
///
/// # Errors
///
/// See [`link_config`].
pub async fn enter_maintenance(layout: &SiteLayout) -> DeployResult<LinkOutcome> {
    link_config(layout, ConfigVariant::Maintenance).await
}

/// Switch the site back to normal operation.
///
/// # Errors
///
/// See [`link_config`].
pub async fn leave_maintenance(layout: &SiteLayout) -> DeployResult<LinkOutcome> {
    link_config(layout, ConfigVariant::Active).await
}

/// Remove the Apache link. Returns whether a link was removed.
///
/// # Errors
///
/// Fails if the link exists but cannot be removed.
pub async fn unlink_config(layout: &SiteLayout) -> DeployResult<bool> {
    let removed = remove_link(&layout.apache_link).await?;
    if removed {
        info!(link = %layout.apache_link.display(), "Removed Apache link");
    }
    Ok(removed)
}

/// Which variant the Apache link currently points at.
///
/// # Errors
///
/// Fails if the link exists but cannot be read.
pub async fn active_variant(layout: &SiteLayout) -> DeployResult<Option<ConfigVariant>> {
    let target = match fs::read_link(&layout.apache_link).await {
        Ok(target) => target,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DeployError::io(&layout.apache_link, e)),
    };

    let variant = ConfigVariant::ALL
        .into_iter()
        .find(|variant| target == layout.config_file(*variant));
    if variant.is_none() {
        warn!(
            link = %layout.apache_link.display(),
            target = %target.display(),
            "Apache link points outside this project's config"
        );
    }
    Ok(variant)
}

async fn path_exists(path: &Path) -> DeployResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| DeployError::io(path, e))
}

async fn remove_link(link: &Path) -> DeployResult<bool> {
    // symlink_metadata so dangling links are found too
    match fs::symlink_metadata(link).await {
        Ok(_) => {
            fs::remove_file(link)
                .await
                .map_err(|e| DeployError::io(link, e))?;
            debug!(link = %link.display(), "Removed existing link");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DeployError::io(link, e)),
    }
}

#[cfg(unix)]
async fn symlink(target: &Path, link: &Path) -> DeployResult<()> {
    fs::symlink(target, link)
        .await
        .map_err(|e| DeployError::io(link, e))
}

#[cfg(not(unix))]
async fn symlink(_target: &Path, link: &Path) -> DeployResult<()> {
    Err(DeployError::Unsupported(format!(
        "cannot create symlink {}",
        link.display()
    )))
}
