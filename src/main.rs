use anyhow::Context;
use clap::Parser;
use release_notify::cli::args::Args;
use release_notify::config::{EnvOverrides, PluginConfig};
use release_notify::infrastructure::{setup_logging, LogFormat, LoggingConfig};
use release_notify::notification::pipeline::{self, PipelineOutcome, TracingLogger};
use release_notify::notification::{ReleaseContext, SlackConfig, SlackNotifier};

fn build_context(args: &Args) -> anyhow::Result<ReleaseContext> {
    let notes = match &args.notes_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read release notes from {}", path))?,
        ),
        None => args.notes.clone(),
    };

    Ok(ReleaseContext {
        version: args.version_number.clone(),
        notes,
        git_tag: args.tag.clone(),
        branch_name: args.branch.clone(),
        repository_url: args.repository_url.clone(),
        package_name: args.package_name.clone(),
    })
}

fn load_config(args: &Args) -> anyhow::Result<PluginConfig> {
    let config = match &args.config {
        Some(path) => PluginConfig::from_file(path)?,
        None => PluginConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn print_dry_run(
    context: &ReleaseContext,
    config: &PluginConfig,
    env: &EnvOverrides,
) -> anyhow::Result<()> {
    match pipeline::prepare(context, config, env, &TracingLogger) {
        Ok(message) => println!("{}", serde_json::to_string_pretty(&message)?),
        Err(outcome) => tracing::info!("dry run finished without a message: {:?}", outcome),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    setup_logging(LoggingConfig {
        level: args.log_level.parse()?,
        format: args.log_format.parse::<LogFormat>()?,
        ..Default::default()
    })?;

    let config = load_config(&args)?;
    let env = EnvOverrides::from_env();
    let context = build_context(&args)?;

    if args.dry_run {
        return print_dry_run(&context, &config, &env);
    }

    let notifier = SlackNotifier::new(SlackConfig::default())?;
    let outcome = pipeline::run(&context, &config, &env, &notifier, &TracingLogger).await?;

    if let PipelineOutcome::Delivered(_) = outcome {
        tracing::info!(version = %context.version, "release notification delivered");
    }

    Ok(())
}
