//! Shellward - run a shell command inside a workspace, with safety checks

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shellward::tools::{tool_definition, ExecuteCommandTool};
use shellward::types::config::ConfigFile;
use shellward::types::{ExecutionRequest, ExecutionResult, ExecutorConfig};
use shellward::util::default_config_path;

#[derive(Parser, Debug)]
#[command(name = "shellward")]
#[command(about = "Shellward - run a shell command inside a workspace, with safety checks")]
#[command(version)]
struct Args {
    /// Command line to run through the platform shell
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        required_unless_present = "schema"
    )]
    command: Vec<String>,

    /// Workspace root; commands may not run outside it
    #[arg(short, long, env = "SHELLWARD_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Working directory, relative to the workspace root
    #[arg(short = 'C', long)]
    cwd: Option<String>,

    /// Timeout (e.g. "500ms", "30s", "2m")
    #[arg(short, long)]
    timeout: Option<humantime::Duration>,

    /// Config file (defaults to config.toml in the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Print the tool definition as JSON and exit
    #[arg(long)]
    schema: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Handle --schema before any other initialization
    if args.schema {
        let definition = serde_json::to_string_pretty(&tool_definition())?;
        println!("{definition}");
        return Ok(ExitCode::SUCCESS);
    }

    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = load_config(&args)?;
    let tool = ExecuteCommandTool::new(config);

    let mut request = ExecutionRequest::new(args.command.join(" "));
    if let Some(cwd) = args.cwd {
        request = request.with_working_directory(cwd);
    }
    if let Some(timeout) = args.timeout {
        let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        request = request.with_timeout(ms);
    }

    let result = tool.execute_request(request).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_plain(&result)?;
    }

    Ok(exit_code(&result))
}

/// Defaults, then the config file, then command-line flags.
fn load_config(args: &Args) -> Result<ExecutorConfig> {
    let mut config = ExecutorConfig::default();

    let file_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => default_config_path().filter(|p| p.is_file()),
    };
    if let Some(path) = file_path {
        let file = ConfigFile::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        config = config
            .apply_file(&file)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
    }

    if let Some(workspace) = &args.workspace {
        config.workspace_root = ExecutorConfig::new(workspace.clone()).workspace_root;
    }

    Ok(config)
}

fn print_plain(result: &ExecutionResult) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if let Some(output) = &result.output {
        stdout.write_all(output.as_bytes())?;
    }
    stdout.flush()?;

    let mut stderr = std::io::stderr().lock();
    if let Some(captured) = &result.metadata.stderr {
        stderr.write_all(captured.as_bytes())?;
    }
    if let Some(error) = &result.error {
        writeln!(stderr, "Error: {error}")?;
    }
    Ok(())
}

/// 0 on success, the child's status on a non-zero exit, 1 otherwise.
fn exit_code(result: &ExecutionResult) -> ExitCode {
    if result.success {
        return ExitCode::SUCCESS;
    }
    result
        .metadata
        .exit_code
        .and_then(|code| u8::try_from(code).ok())
        .filter(|&code| code != 0)
        .map_or(ExitCode::FAILURE, ExitCode::from)
}
