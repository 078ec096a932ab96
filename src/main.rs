use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xml_studio::ai::GeminiClient;
use xml_studio::cli::{Cli, Command, InputArgs, VerbosityLevel};
use xml_studio::config::ConfigManager;
use xml_studio::error::StudioError;
use xml_studio::output::Output;
use xml_studio::session::{DirectoryTarget, Status, Workspace};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    match run(cli).await {
        Ok(Status::Error) => process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

fn init_logging(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    // A second initialisation (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn read_input(workspace: &mut Workspace, args: &InputArgs) -> Result<()> {
    match args.path() {
        Some(path) => workspace
            .load_upload(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read standard input")?;
            workspace.set_input(buffer);
        }
    }

    if workspace.input().trim().is_empty() {
        return Err(StudioError::EmptyInput.into());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<Status> {
    init_logging(cli.verbosity());
    cli.validate().map_err(|msg| anyhow!(msg))?;

    let config = ConfigManager::load_config(&cli).await?;
    debug!(model = %config.ai.model, timeout = config.ai.timeout_seconds, "configuration loaded");

    let output = Output::with_colors(config.output.verbosity(), config.output.color);
    let mut workspace = Workspace::new();

    if let Some(args) = cli.input() {
        read_input(&mut workspace, args).await?;
    }

    let started = Instant::now();
    let status = match &cli.command {
        Command::Validate(_) => workspace.validate(),
        Command::Format(_) => workspace.format(),
        Command::Minify(_) => workspace.minify(),
        Command::Repair(_) => {
            let ai = GeminiClient::new(config.ai.clone())?;
            workspace.repair(&ai).await
        }
        Command::Convert(_) => {
            let ai = GeminiClient::new(config.ai.clone())?;
            workspace.convert_to_json(&ai).await
        }
        Command::Generate => {
            let ai = GeminiClient::new(config.ai.clone())?;
            workspace.generate_sample(&ai).await
        }
    };
    info!("{:?} finished with status {:?}", cli.command, status);

    if let Some(line) = output.format_status(status, workspace.message()) {
        eprintln!("{}", line);
    }
    if status == Status::Error {
        if let Some(error) = workspace.validation_error() {
            eprintln!("{}", output.format_validation_error(error));
        }
        return Ok(status);
    }

    emit_result(&cli, &workspace, &output)?;

    if let Some(line) = output.format_timing(started.elapsed()) {
        eprintln!("{}", line);
    }
    Ok(status)
}

fn emit_result(cli: &Cli, workspace: &Workspace, output: &Output) -> Result<()> {
    match (&cli.command, cli.output_dir()) {
        (Command::Validate(_), _) => {}
        (Command::Generate, _) => println!("{}", workspace.input()),
        (_, Some(dir)) => save_to_directory(workspace, dir, output)?,
        (_, None) => println!("{}", workspace.output()),
    }
    Ok(())
}

fn save_to_directory(workspace: &Workspace, dir: &Path, output: &Output) -> Result<()> {
    let mut target = DirectoryTarget::new(dir);
    let download = workspace
        .save_download(&mut target)
        .with_context(|| format!("Failed to save into {}", dir.display()))?;

    if let Some(line) = output.format_saved(&target.path_for(&download), workspace.view_mode()) {
        eprintln!("{}", line);
    }
    Ok(())
}
