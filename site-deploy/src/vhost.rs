//! Built-in Apache virtual-host templates.
//!
//! One template per environment and variant, embedded at compile time from
//! `templates/<env>/<file>`. The only variable is `project_name`.

use config_engine::{ensure_fully_rendered, ConfigError, RenderContext, Template};

use crate::environment::{ConfigVariant, Environment};
use crate::error::DeployResult;
use crate::project::ProjectName;

/// Variable every virtual-host template depends on
pub const PROJECT_NAME_VAR: &str = "project_name";

const STAGING_ACTIVE: &str = include_str!("../templates/stg/apache");
const STAGING_MAINTENANCE: &str = include_str!("../templates/stg/apache.maintenance");
const PRODUCTION_ACTIVE: &str = include_str!("../templates/prd/apache");
const PRODUCTION_MAINTENANCE: &str = include_str!("../templates/prd/apache.maintenance");

/// Raw text of the built-in template
pub fn template_source(environment: Environment, variant: ConfigVariant) -> &'static str {
    match (environment, variant) {
        (Environment::Staging, ConfigVariant::Active) => STAGING_ACTIVE,
        (Environment::Staging, ConfigVariant::Maintenance) => STAGING_MAINTENANCE,
        (Environment::Production, ConfigVariant::Active) => PRODUCTION_ACTIVE,
        (Environment::Production, ConfigVariant::Maintenance) => PRODUCTION_MAINTENANCE,
    }
}

/// # Errors
///
/// Fails only if a built-in template is malformed.
pub fn template_for(environment: Environment, variant: ConfigVariant) -> DeployResult<Template> {
    Ok(Template::parse(template_source(environment, variant))?)
}

/// Render the built-in template for `project`.
///
/// # Errors
///
/// Returns a template error if rendering leaves placeholders behind.
pub fn render_vhost(
    environment: Environment,
    variant: ConfigVariant,
    project: &ProjectName,
) -> DeployResult<String> {
    let template = template_for(environment, variant)?;
    let context = RenderContext::new().with(PROJECT_NAME_VAR, project.as_str());

    tracing::debug!(
        environment = %environment,
        variant = %variant,
        project = %project,
        "Rendering virtual host"
    );
    render_with_context(&template, &context)
}

/// Render any virtual-host template with a full context.
///
/// `project_name` must be present and non-empty, even when the template
/// does not reference it. Any other text is accepted as long as it holds no
/// placeholder delimiters.
///
/// # Errors
///
/// Fails if `project_name` is missing or empty, if a value contains `{{` or
/// `}}`, or if the template references a variable the context lacks.
pub fn render_with_context(template: &Template, context: &RenderContext) -> DeployResult<String> {
    match context.get(PROJECT_NAME_VAR) {
        None => return Err(ConfigError::MissingVariable(PROJECT_NAME_VAR.to_string()).into()),
        Some("") => return Err(ConfigError::EmptyVariable(PROJECT_NAME_VAR.to_string()).into()),
        Some(_) => {}
    }

    let rendered = template.render(context)?;
    ensure_fully_rendered(&rendered)?;
    Ok(rendered)
}
