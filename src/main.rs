use review_chain::cli::commands::{self, RunArgs};
use review_chain::cli::output::Output;
use review_chain::cli::{AgentCommands, Cli, Commands};
use review_chain::utils::config::{ChainConfig, LogFormat, RuntimeConfig};
use review_chain::Result;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env, if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = ChainConfig::load_or_default(&cli.config);
    let runtime = config
        .as_ref()
        .map(|c| c.runtime.clone())
        .unwrap_or_default();
    init_tracing(&runtime, cli.verbose);

    let result = match config {
        Ok(config) => dispatch(cli, config, output).await,
        // `config --validate` reports the load error itself
        Err(_) if matches!(cli.command, Commands::Config { .. }) => {
            dispatch(cli, ChainConfig::default(), output).await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli, config: ChainConfig, output: Output) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            output: report_path,
            notes,
            api_key,
        } => {
            let args = RunArgs {
                input,
                output: report_path,
                notes,
                api_key,
            };
            commands::run(&config, args, output).await?;
        }
        Commands::Config { full, validate } => {
            commands::config(&cli.config, full, validate, output)?;
        }
        Commands::Agents(AgentCommands::List) => {
            commands::agents_list(&config.agent_store()?, output);
        }
        Commands::Agents(AgentCommands::Show { id }) => {
            commands::agents_show(&config.agent_store()?, &id, output)?;
        }
    }
    Ok(())
}

/// Logs go to stderr so a report on stdout can be piped
fn init_tracing(runtime: &RuntimeConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        runtime.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("review_chain={}", default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match runtime.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
