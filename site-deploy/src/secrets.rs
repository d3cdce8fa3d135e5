// Django SECRET_KEY generation
use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{DeployError, DeployResult};
use crate::layout::SiteLayout;

/// Characters a generated key is drawn from
pub const SECRET_KEY_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";

pub const DEFAULT_SECRET_KEY_LENGTH: usize = 50;

/// Random key of `length` characters from [`SECRET_KEY_CHARS`]
pub fn generate_secret_key(length: usize) -> String {
    generate_secret_key_with(&mut rand::thread_rng(), length)
}

pub fn generate_secret_key_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let charset = SECRET_KEY_CHARS.as_bytes();
    (0..length)
        .filter_map(|_| charset.choose(&mut *rng))
        .map(|&byte| char::from(byte))
        .collect()
}

/// Settings line assigning `key`
pub fn secret_key_line(key: &str) -> String {
    format!("SECRET_KEY='{key}'\n")
}

/// Append a `SECRET_KEY` assignment to the project's site settings,
/// creating the file and its directories if needed.
///
/// # Errors
///
/// Fails if the settings file cannot be created or written.
pub async fn append_secret_key(layout: &SiteLayout, key: &str) -> DeployResult<PathBuf> {
    let path = layout.site_settings.clone();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DeployError::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .map_err(|e| DeployError::io(&path, e))?;
    file.write_all(secret_key_line(key).as_bytes())
        .await
        .map_err(|e| DeployError::io(&path, e))?;
    file.flush().await.map_err(|e| DeployError::io(&path, e))?;

    tracing::info!(path = %path.display(), "Appended secret key to site settings");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::environment::Environment;
    use crate::project::ProjectName;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_key_length_and_charset() {
        let key = generate_secret_key(DEFAULT_SECRET_KEY_LENGTH);
        assert_eq!(key.chars().count(), 50);
        assert!(key.chars().all(|c| SECRET_KEY_CHARS.contains(c)));
        assert!(generate_secret_key(0).is_empty());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let first = generate_secret_key_with(&mut StdRng::seed_from_u64(7), 32);
        let second = generate_secret_key_with(&mut StdRng::seed_from_u64(7), 32);
        assert_eq!(first, second);
    }

    #[test]
    fn test_secret_key_line() {
        assert_eq!(secret_key_line("abc"), "SECRET_KEY='abc'\n");
        // Generated keys never need escaping inside single quotes
        assert!(!SECRET_KEY_CHARS.contains('\''));
    }

    #[tokio::test]
    async fn test_append_secret_key() {
        let temp_dir = TempDir::new().unwrap();
        let config = SiteConfig {
            users_home: temp_dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        let layout = SiteLayout::new(
            &config,
            ProjectName::parse("acme").unwrap(),
            Environment::Production,
        );

        append_secret_key(&layout, "first").await.unwrap();
        let path = append_secret_key(&layout, "second").await.unwrap();

        let contents = fs::read_to_string(path).await.unwrap();
        assert_eq!(contents, "SECRET_KEY='first'\nSECRET_KEY='second'\n");
    }
}
