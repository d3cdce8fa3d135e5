//! Operations CLI for sitectl
//!
//! `sitectl` renders the Apache virtual-host configuration for a WSGI site
//! and manages the files around it on an app host.
//!
//! # Example Usage
//!
//! ```bash
//! # Render the production vhost for a project
//! sitectl render --env prd --project acme
//!
//! # Render a custom template with extra variables
//! sitectl render --template vhost.tpl --project acme --var port=8080
//!
//! # Create the project's directories, remove them again
//! sitectl setup-dirs --env stg --project acme
//! sitectl destroy --env stg --project acme --yes
//!
//! # Write conf/stg/apache and conf/stg/apache.maintenance, then link
//! sitectl write-conf --env stg --project acme
//! sitectl link --env stg --project acme
//!
//! # Maintenance mode
//! sitectl mro start --env prd --project acme
//! sitectl mro stop --env prd --project acme
//!
//! # Secrets and hosts
//! sitectl genkey
//! sitectl siteconf --env prd --project acme
//! sitectl roles --env prd --input instances.txt
//! ```

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::run;
