use clap::{CommandFactory, Parser, Subcommand};
use fundtrack::cli::holdings::HoldingsRequest;
use fundtrack::cli::render::OutputFormat;
use fundtrack::core::log::init_logging;
use std::io::Write;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show available fund aliases
    ListFunds,
    /// Show top holdings from a fund's latest 13F filing
    Holdings {
        /// Fund alias (e.g. berkshire), CIK number or fund name
        fund: String,

        /// Number of top holdings to show
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        top: Option<i64>,

        /// RapidAPI key (or set RAPIDAPI_KEY)
        #[arg(short, long)]
        key: Option<String>,
    },
}

impl From<Commands> for fundtrack::AppCommand {
    fn from(cmd: Commands) -> fundtrack::AppCommand {
        match cmd {
            Commands::ListFunds => fundtrack::AppCommand::ListFunds,
            Commands::Holdings { fund, top, key } => {
                fundtrack::AppCommand::Holdings(HoldingsRequest {
                    query: fund,
                    top,
                    api_key: key,
                })
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fundtrack::cli::setup::setup()
            .map(|path| format!("Created default configuration at {}\n", path.display())),
        Some(cmd) => {
            fundtrack::run_command(cmd.into(), cli.config_path.as_deref(), cli.output).await
        }
        None => {
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            let report = fundtrack::cli::error_report(&e, cli.output);
            if let Some(out) = report.stdout {
                print!("{out}");
            }
            if let Some(err) = report.stderr {
                eprint!("{err}");
            }
            ExitCode::from(report.exit_code)
        }
    }
}
