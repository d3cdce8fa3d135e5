//! Creating and removing a project's directories on the host.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::apache::unlink_config;
use crate::error::{DeployError, DeployResult};
use crate::layout::SiteLayout;

/// Create the sites, log and virtualenv directories if missing.
///
/// Returns the directories in creation order.
///
/// # Errors
///
/// Fails if a directory cannot be created.
pub async fn prepare_directories(layout: &SiteLayout) -> DeployResult<Vec<PathBuf>> {
    let dirs = [&layout.sites, &layout.logs, &layout.virtualenv];

    let mut prepared = Vec::with_capacity(dirs.len());
    for dir in dirs {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| DeployError::io(dir, e))?;
        prepared.push(dir.clone());
    }

    info!(project = %layout.project, "Project directories ready");
    Ok(prepared)
}

/// Remove the Apache link, then the project, log and virtualenv
/// directories. Paths that do not exist are skipped.
///
/// Returns what was actually removed.
///
/// # Errors
///
/// Fails on the first path that exists but cannot be removed.
pub async fn destroy(layout: &SiteLayout) -> DeployResult<Vec<PathBuf>> {
    warn!(
        project = %layout.project,
        environment = %layout.environment,
        "Removing all project files"
    );

    let mut removed = Vec::new();
    if unlink_config(layout).await? {
        removed.push(layout.apache_link.clone());
    }

    for dir in [&layout.project_dir, &layout.logs, &layout.virtualenv] {
        if remove_tree(dir).await? {
            info!(path = %dir.display(), "Removed directory");
            removed.push(dir.clone());
        }
    }
    Ok(removed)
}

async fn remove_tree(dir: &Path) -> DeployResult<bool> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DeployError::io(dir, e)),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::apache::{active_variant, leave_maintenance, write_configs};
    use crate::config::SiteConfig;
    use crate::environment::{ConfigVariant, Environment};
    use crate::project::ProjectName;
    use tempfile::TempDir;

    fn create_test_layout(temp_dir: &TempDir, project: &str) -> SiteLayout {
        let config = SiteConfig {
            users_home: temp_dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        SiteLayout::new(
            &config,
            ProjectName::parse(project).unwrap(),
            Environment::Production,
        )
    }

    #[tokio::test]
    async fn test_prepare_directories_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let layout = create_test_layout(&temp_dir, "acme");

        let first = prepare_directories(&layout).await.unwrap();
        assert_eq!(
            first,
            vec![
                layout.sites.clone(),
                layout.logs.clone(),
                layout.virtualenv.clone()
            ]
        );
        for dir in &first {
            assert!(fs::metadata(dir).await.unwrap().is_dir());
        }

        assert_eq!(prepare_directories(&layout).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_destroy_removes_project_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let layout = create_test_layout(&temp_dir, "acme");
        let neighbour = create_test_layout(&temp_dir, "other");

        for site in [&layout, &neighbour] {
            prepare_directories(site).await.unwrap();
            write_configs(site).await.unwrap();
            leave_maintenance(site).await.unwrap();
        }

        let removed = destroy(&layout).await.unwrap();
        assert_eq!(
            removed,
            vec![
                layout.apache_link.clone(),
                layout.project_dir.clone(),
                layout.logs.clone(),
                layout.virtualenv.clone()
            ]
        );
        assert!(!fs::try_exists(&layout.project_dir).await.unwrap());
        assert_eq!(active_variant(&layout).await.unwrap(), None);

        // Shared directories and other projects survive
        assert!(fs::try_exists(&layout.sites).await.unwrap());
        assert!(fs::try_exists(&neighbour.project_dir).await.unwrap());
        assert_eq!(
            active_variant(&neighbour).await.unwrap(),
            Some(ConfigVariant::Active)
        );
    }

    #[tokio::test]
    async fn test_destroy_missing_project_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let layout = create_test_layout(&temp_dir, "acme");

        assert!(destroy(&layout).await.unwrap().is_empty());
    }
}
