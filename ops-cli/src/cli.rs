// Command-line definition for sitectl
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use logger_redacted::LoggerConfig;
use site_deploy::{Environment, ProjectName, DEFAULT_SECRET_KEY_LENGTH};

#[derive(Parser, Debug)]
#[command(name = "sitectl")]
#[command(version, about = "Render and manage Apache virtual hosts for WSGI sites")]
pub struct Cli {
    /// Site configuration file (TOML or YAML)
    #[arg(long, short = 'c', global = true, env = "SITECTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Log secrets unmasked
    #[arg(long, global = true)]
    pub no_redact: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            redaction_enabled: !self.no_redact,
            json_output: self.json_logs,
            ..LoggerConfig::default()
        }
        .with_verbosity(self.verbose)
    }
}

/// Project and environment a command acts on
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Deployment environment (stg or prd)
    #[arg(long, short = 'e', env = "SITECTL_ENV")]
    pub env: Environment,

    /// Project name
    #[arg(long, short = 'p', env = "SITECTL_PROJECT")]
    pub project: ProjectName,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a virtual-host template to stdout or a file
    Render(RenderArgs),

    /// List the variables a template uses
    Placeholders {
        /// Template file
        #[arg(long, short = 't')]
        template: PathBuf,
    },

    /// Print the host paths used by a project
    Layout {
        #[command(flatten)]
        site: SiteArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the sites, log and virtualenv directories
    SetupDirs(SiteArgs),

    /// Write the active and maintenance configs under conf/<env>/
    WriteConf(SiteArgs),

    /// Point the Apache link at a config variant
    Link {
        #[command(flatten)]
        site: SiteArgs,

        /// Link the maintenance config instead of the active one
        #[arg(long)]
        maintenance: bool,
    },

    /// Remove the Apache link
    Unlink(SiteArgs),

    /// Show which config variant is linked
    Status {
        #[command(flatten)]
        site: SiteArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the Apache link and the project, log and virtualenv directories
    Destroy {
        #[command(flatten)]
        site: SiteArgs,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Maintenance mode on or off
    Mro {
        #[command(subcommand)]
        action: MroAction,
    },

    /// Print a random secret key
    Genkey {
        /// Key length in characters
        #[arg(long, short = 'l', default_value_t = DEFAULT_SECRET_KEY_LENGTH)]
        length: usize,
    },

    /// Generate a secret key and append it to the project's site settings
    Siteconf {
        #[command(flatten)]
        site: SiteArgs,

        /// Key length in characters
        #[arg(long, short = 'l', default_value_t = DEFAULT_SECRET_KEY_LENGTH)]
        length: usize,
    },

    /// Group instances into roles from `name dns` lines
    Roles {
        /// Deployment environment (stg or prd)
        #[arg(long, short = 'e', env = "SITECTL_ENV")]
        env: Environment,

        /// Instance list; stdin when omitted
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MroAction {
    /// Link the maintenance config
    Start(SiteArgs),
    /// Link the active config again
    Stop(SiteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Deployment environment; selects the built-in template
    #[arg(long, short = 'e', env = "SITECTL_ENV", required_unless_present = "template")]
    pub env: Option<Environment>,

    /// Project name; overrides any project_name variable
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Render the maintenance variant
    #[arg(long, conflicts_with = "template")]
    pub maintenance: bool,

    /// Template file to render instead of a built-in one
    #[arg(long, short = 't')]
    pub template: Option<PathBuf>,

    /// Extra template variable
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// YAML, TOML or JSON file of template variables
    #[arg(long)]
    pub vars_file: Option<PathBuf>,

    /// Write here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
