use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use precis::config::GatewayConfig;
use precis::consts::{DEFAULT_ENDPOINT, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};
use precis::gateway::{Analysis, CompletionResult, Gateway};
use precis::input::read_input;
use precis::report::{render_analysis, render_sentiment};
use precis::server::{self, AppState};

/// Used by `precis demo` (and by `precis` with no subcommand).
const DEMO_TEXT: &str = "OpenRouter is an amazing AI service that makes building apps super easy. \
                         I love how fast it is!";

#[derive(Parser)]
#[command(
    name = "precis",
    version,
    about = "Summaries and sentiment for any text, courtesy of a remote LLM."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Model identifier, e.g. openai/gpt-4o-mini
    #[arg(short, long, env = "MODEL", global = true)]
    model: Option<String>,

    /// Chat completions endpoint (any OpenAI-compatible API)
    #[arg(long, env = "OPENROUTER_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Completion request timeout in seconds
    #[arg(
        short,
        long,
        env = "OPENROUTER_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout: u64,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize text in 3-6 sentences
    Summarize(TextArgs),
    /// Judge the sentiment of text
    Sentiment {
        #[command(flatten)]
        input: TextArgs,
        /// Print the decoded result as JSON instead of the model's raw reply
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summary and sentiment together
    Analyze {
        #[command(flatten)]
        input: TextArgs,
        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run both tasks on a built-in sample text
    Demo,
    /// Serve the HTTP API and form UI
    Serve {
        /// Interface to bind
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Args)]
struct TextArgs {
    /// Text to process (otherwise read from --file or stdin)
    text: Option<String>,

    /// Read text from a file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("precis=debug")
        } else {
            EnvFilter::new("precis=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = GatewayConfig::new(cli.api_key)
        .with_endpoint(cli.endpoint)
        .with_timeout(Duration::from_secs(cli.timeout));
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if !config.has_api_key() {
        warn!("OPENROUTER_API_KEY is not set. API calls will fail.");
    }

    let gateway = Gateway::from_config(&config)?;

    match cli.command.unwrap_or(Command::Demo) {
        Command::Summarize(input) => {
            let text = read_input(input.text, input.file.as_deref())?;
            let Some(result) = interruptible(gateway.summarize(&text, None)).await else {
                return Ok(ExitCode::from(130));
            };
            print_result(result, Ok)
        }
        Command::Sentiment { input, json } => {
            let text = read_input(input.text, input.file.as_deref())?;
            let Some(result) = interruptible(gateway.analyze_sentiment(&text, None)).await else {
                return Ok(ExitCode::from(130));
            };
            print_result(result, |raw| render_sentiment(&raw, json))
        }
        Command::Analyze { input, json } => {
            let text = read_input(input.text, input.file.as_deref())?;
            let Some(analysis) = interruptible(gateway.analyze(&text, None)).await else {
                return Ok(ExitCode::from(130));
            };
            print_analysis(&analysis, json)
        }
        Command::Demo => {
            let Some(analysis) = interruptible(gateway.analyze(DEMO_TEXT, None)).await else {
                return Ok(ExitCode::from(130));
            };
            print_analysis(&analysis, false)
        }
        Command::Serve { host, port } => {
            let state = AppState::new(gateway, config.has_api_key());
            server::serve(state, &host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run `fut` unless Ctrl+C arrives first.
async fn interruptible<T>(fut: impl Future<Output = T>) -> Option<T> {
    tokio::select! {
        out = fut => Some(out),
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\ninterrupted");
            None
        }
    }
}

fn print_result(
    result: CompletionResult,
    render: impl FnOnce(String) -> serde_json::Result<String>,
) -> anyhow::Result<ExitCode> {
    match result {
        Ok(text) => {
            println!("{}", render(text)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_analysis(analysis: &Analysis, json: bool) -> anyhow::Result<ExitCode> {
    println!("{}", render_analysis(analysis, json)?);
    Ok(if analysis.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn timeout_defaults_to_const() {
        let cli = Cli::try_parse_from(["precis", "demo"]).unwrap();
        assert_eq!(Duration::from_secs(cli.timeout), DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["precis", "--timeout", "0", "demo"]).is_err());
        let cli = Cli::try_parse_from(["precis", "-t", "5", "demo"]).unwrap();
        assert_eq!(cli.timeout, 5);
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["precis"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn analyze_takes_json_flag() {
        let cli = Cli::try_parse_from(["precis", "analyze", "--json", "some text"]).unwrap();
        match cli.command {
            Some(Command::Analyze { input, json }) => {
                assert!(json);
                assert_eq!(input.text.as_deref(), Some("some text"));
            }
            _ => panic!("expected analyze"),
        }
    }
}
