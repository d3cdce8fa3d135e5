use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DeployError, DeployResult};

const MAX_LABEL_LEN: usize = 63;

/// Project name, usable as a DNS label, a path component and a WSGI
/// process-group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidProjectName`] if the name is empty,
    /// longer than 63 bytes, or not of the form `[A-Za-z0-9]` followed by
    /// `[A-Za-z0-9-]` without a trailing hyphen.
    pub fn parse(name: &str) -> DeployResult<Self> {
        let invalid = |reason: &str| DeployError::InvalidProjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if name.len() > MAX_LABEL_LEN {
            return Err(invalid("must be at most 63 characters"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("only ASCII letters, digits and '-' are allowed"));
        }
        if name.starts_with('-') || name.ends_with('-') {
            return Err(invalid("must not start or end with '-'"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectName {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["acme", "cabrogger", "timeline-js", "a", "3d"] {
            assert_eq!(ProjectName::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_invalid_names() {
        let long = "a".repeat(64);
        for name in ["", "-acme", "acme-", "ac me", "acme.com", "acme/../etc", "ac_me", long.as_str()] {
            assert!(
                matches!(ProjectName::parse(name), Err(DeployError::InvalidProjectName { .. })),
                "{name:?} should be rejected"
            );
        }
    }
}
