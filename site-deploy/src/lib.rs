//! Apache virtual-host rendering and site layout for sitectl
//!
//! Everything needed to put a Django/WSGI project's Apache configuration in
//! place on an app host:
//! - Built-in staging and production virtual-host templates, each with a
//!   maintenance variant
//! - The host path layout for a project (`/home/apps/sites/<project>`, ...),
//!   and creating or removing its directories
//! - Writing rendered configs and switching the Apache link between the
//!   active and maintenance variants
//! - Secret-key generation for the project's site settings
//! - Classifying instance names (`stg-app1`, `prd-work2`) into roles
//!
//! # Example
//!
//! ```rust
//! use site_deploy::{render_vhost, ConfigVariant, Environment, ProjectName};
//!
//! let project = ProjectName::parse("acme").unwrap();
//! let conf = render_vhost(Environment::Production, ConfigVariant::Active, &project).unwrap();
//! assert!(conf.contains("ServerAlias acme.com *acme.com"));
//! ```

pub mod apache;
pub mod config;
pub mod directories;
pub mod environment;
pub mod error;
pub mod layout;
pub mod project;
pub mod roles;
pub mod secrets;
pub mod vhost;

pub use apache::*;
pub use config::SiteConfig;
pub use directories::{destroy, prepare_directories};
pub use environment::*;
pub use error::*;
pub use layout::SiteLayout;
pub use project::ProjectName;
pub use roles::*;
pub use secrets::*;
pub use vhost::*;
