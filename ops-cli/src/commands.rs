// Subcommand handlers
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use config_engine::{
    ContextProvider, EnvProvider, FileProvider, LayeredContext, PairsProvider, RenderContext,
    Template,
};
use logger_redacted::{redacted_debug, redacted_info, SecretRedactor};
use serde_json::json;
use site_deploy::{
    active_variant, append_secret_key, destroy, enter_maintenance, generate_secret_key,
    leave_maintenance, link_config, parse_instance_line, prepare_directories,
    render_with_context, secret_key_line, template_source, unlink_config, write_configs,
    ConfigVariant, Environment, LinkOutcome, RoleMap, SiteConfig, SiteLayout, PROJECT_NAME_VAR,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::info;

use crate::cli::{Cli, Command, MroAction, RenderArgs, SiteArgs};

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns the first failure with context describing the step that failed.
pub async fn run(cli: Cli, redactor: &SecretRedactor) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Render(args) => render(&args).await,
        Command::Placeholders { template } => placeholders(&template).await,
        Command::Layout { site, json } => layout(config_path, &site, json),
        Command::SetupDirs(site) => {
            let layout = load_layout(config_path, &site)?;
            for dir in prepare_directories(&layout).await? {
                println!("{}", dir.display());
            }
            Ok(())
        }
        Command::Destroy { site, yes } => {
            let layout = load_layout(config_path, &site)?;
            let question = format!(
                "Destroy {} project {} deployment? (y/n) ",
                layout.project, layout.environment
            );
            if !yes && !confirm(&question, BufReader::new(tokio::io::stdin())).await? {
                println!("aborting ...");
                return Ok(());
            }
            for path in destroy(&layout).await? {
                println!("removed {}", path.display());
            }
            Ok(())
        }
        Command::WriteConf(site) => {
            let layout = load_layout(config_path, &site)?;
            for path in write_configs(&layout).await? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Link { site, maintenance } => {
            let layout = load_layout(config_path, &site)?;
            let outcome = link_config(&layout, ConfigVariant::from_maintenance(maintenance)).await?;
            report_link(&outcome);
            Ok(())
        }
        Command::Unlink(site) => {
            let layout = load_layout(config_path, &site)?;
            if unlink_config(&layout).await? {
                println!("removed {}", layout.apache_link.display());
            } else {
                println!("no link at {}", layout.apache_link.display());
            }
            Ok(())
        }
        Command::Status { site, json } => status(config_path, &site, json).await,
        Command::Mro { action } => {
            let outcome = match action {
                MroAction::Start(site) => enter_maintenance(&load_layout(config_path, &site)?).await?,
                MroAction::Stop(site) => leave_maintenance(&load_layout(config_path, &site)?).await?,
            };
            report_link(&outcome);
            Ok(())
        }
        Command::Genkey { length } => {
            let key = generate_secret_key(length);
            redacted_debug!(redactor, "Generated {}", secret_key_line(&key).trim_end());
            println!("{key}");
            Ok(())
        }
        Command::Siteconf { site, length } => {
            let layout = load_layout(config_path, &site)?;
            let key = generate_secret_key(length);
            let path = append_secret_key(&layout, &key).await?;
            redacted_info!(
                redactor,
                "Site settings {} now end with {}",
                path.display(),
                secret_key_line(&key).trim_end()
            );
            println!("{}", path.display());
            Ok(())
        }
        Command::Roles { env, input } => roles(config_path, env, input.as_deref()).await,
    }
}

async fn render(args: &RenderArgs) -> Result<()> {
    let template = match (&args.template, args.env) {
        (Some(path), _) => load_template(path).await?,
        (None, Some(env)) => {
            Template::parse(template_source(env, ConfigVariant::from_maintenance(args.maintenance)))?
        }
        (None, None) => anyhow::bail!("either --env or --template is required"),
    };

    let context = render_context(args)?;
    let rendered = render_with_context(&template, &context).context("Rendering failed")?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Rendered configuration written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Variables from file, then `SITECTL_VAR_*`, then `--var`, then `--project`
fn render_context(args: &RenderArgs) -> Result<RenderContext> {
    let mut layers = LayeredContext::new();
    if let Some(path) = &args.vars_file {
        layers = layers.add_source(FileProvider::new(path));
    }
    let mut context = layers
        .add_source(EnvProvider::default())
        .add_source(PairsProvider::new(args.vars.iter().cloned()))
        .load()
        .context("Failed to load template variables")?;

    if let Some(project) = &args.project {
        context.insert(PROJECT_NAME_VAR, project.as_str());
    }
    Ok(context)
}

async fn load_template(path: &Path) -> Result<Template> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    Template::parse(text).with_context(|| format!("Invalid template {}", path.display()))
}

async fn placeholders(path: &Path) -> Result<()> {
    let template = load_template(path).await?;
    for name in template.placeholders() {
        println!("{name}");
    }
    Ok(())
}

fn load_layout(config_path: Option<&Path>, site: &SiteArgs) -> Result<SiteLayout> {
    let config = SiteConfig::load(config_path).context("Failed to load site configuration")?;
    Ok(SiteLayout::new(&config, site.project.clone(), site.env))
}

fn layout(config_path: Option<&Path>, site: &SiteArgs, as_json: bool) -> Result<()> {
    let layout = load_layout(config_path, site)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        println!("{:<24}{}", "server_name", layout.server_name);
        for (name, path) in layout.entries() {
            println!("{name:<24}{}", path.display());
        }
    }
    Ok(())
}

async fn status(config_path: Option<&Path>, site: &SiteArgs, as_json: bool) -> Result<()> {
    let layout = load_layout(config_path, site)?;
    let variant = active_variant(&layout).await?;

    if as_json {
        let report = json!({
            "project": layout.project,
            "environment": layout.environment,
            "link": layout.apache_link,
            "variant": variant,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let state = variant.map_or_else(|| "not linked".to_string(), |v| v.to_string());
        println!("{} ({}): {state}", layout.project, layout.environment);
    }
    Ok(())
}

async fn roles(config_path: Option<&Path>, env: Environment, input: Option<&Path>) -> Result<()> {
    let config = SiteConfig::load(config_path).context("Failed to load site configuration")?;

    let text = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read instances from stdin")?;
            buffer
        }
    };

    let instances = text.lines().filter_map(parse_instance_line);
    let map = RoleMap::from_instances(env, &config.app_user, instances)?;
    info!(environment = %env, hosts = map.len(), "Classified instances");
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

/// Ask on stderr and read one answer line; only `y`/`yes` confirms.
async fn confirm<R>(question: &str, mut input: R) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    eprint!("{question}");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .await
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn report_link(outcome: &LinkOutcome) {
    match outcome {
        LinkOutcome::Linked { link, target } => {
            println!("{} -> {}", link.display(), target.display());
        }
        LinkOutcome::Skipped { missing } => {
            println!("skipped: {} does not exist", missing.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn render_args(argv: &[&str]) -> RenderArgs {
        let mut full = vec!["sitectl", "render"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Render(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_project_flag_overrides_var_pairs() {
        let args = render_args(&[
            "-e", "stg", "--var", "project_name=other", "--var", "port=80", "-p", "acme",
        ]);
        let context = render_context(&args).unwrap();
        assert_eq!(context.get("project_name"), Some("acme"));
        assert_eq!(context.get("port"), Some("80"));
    }

    #[test]
    fn test_vars_file_is_layered_under_pairs() {
        let dir = TempDir::new().unwrap();
        let vars = dir.path().join("vars.toml");
        std::fs::write(&vars, "project_name = \"acme\"\nport = 8000\n").unwrap();

        let args = render_args(&[
            "-e", "stg", "--vars-file", vars.to_str().unwrap(), "--var", "port=9000",
        ]);
        let context = render_context(&args).unwrap();
        assert_eq!(context.get("project_name"), Some("acme"));
        assert_eq!(context.get("port"), Some("9000"));
    }

    #[tokio::test]
    async fn test_render_custom_template_to_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("vhost.tpl");
        let output = dir.path().join("out/vhost.conf");
        tokio::fs::write(&template, "ServerName {{ project_name }}.example.org:{{port}}\n")
            .await
            .unwrap();

        let args = render_args(&[
            "-t",
            template.to_str().unwrap(),
            "-p",
            "acme",
            "--var",
            "port=8080",
            "-o",
            output.to_str().unwrap(),
        ]);
        render(&args).await.unwrap();

        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(written, "ServerName acme.example.org:8080\n");
    }

    #[tokio::test]
    async fn test_render_builtin_accepts_non_label_project() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("apache");

        let args = render_args(&["-e", "stg", "-p", "my_site", "-o", output.to_str().unwrap()]);
        render(&args).await.unwrap();

        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert!(written.contains("ServerName my_site.knilab.com\n"));
    }

    #[tokio::test]
    async fn test_confirm_accepts_only_yes() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            (" yes ", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
            ("yep\n", false),
        ] {
            assert_eq!(confirm("? ", answer.as_bytes()).await.unwrap(), expected, "{answer:?}");
        }
    }

    #[tokio::test]
    async fn test_render_rejects_missing_variable() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("vhost.tpl");
        tokio::fs::write(&template, "{{ project_name }} {{ missing }}").await.unwrap();

        let args = render_args(&["-t", template.to_str().unwrap(), "-p", "acme"]);
        assert!(render(&args).await.is_err());
    }
}
