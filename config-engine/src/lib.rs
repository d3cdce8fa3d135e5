//! Configuration rendering engine for sitectl
//!
//! Renders web-server configuration templates that use `{{ name }}`
//! placeholders. The engine is intentionally small:
//! - Templates are parsed once into literal and placeholder segments
//! - Rendering substitutes values and copies all other bytes verbatim
//! - Variable values come from explicit pairs, files or the environment
//! - Rendered output can be checked for leftover placeholders
//!
//! # Example
//!
//! ```rust
//! use config_engine::{ensure_fully_rendered, RenderContext, Template};
//!
//! let template = Template::parse("ServerName {{ project_name }}.knilab.com").unwrap();
//! let context = RenderContext::new().with("project_name", "acme");
//!
//! let rendered = template.render(&context).unwrap();
//! assert_eq!(rendered, "ServerName acme.knilab.com");
//! assert!(ensure_fully_rendered(&rendered).is_ok());
//! ```

pub mod error;
pub mod providers;
pub mod templates;
pub mod validation;

pub use error::*;
pub use providers::*;
pub use templates::*;
pub use validation::*;
