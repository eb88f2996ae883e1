use crate::commands::{run_ask, run_batch, run_evaluate, AskArgs, BatchArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_assistant::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Assistant",
    about = "Classify loan eligibility and talk to the loan assistant from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify a single loan application
    Evaluate(EvaluateArgs),
    /// Classify every application in a CSV file
    Batch(BatchArgs),
    /// Send one message to the assistant and print its reply
    Ask(AskArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Batch(args) => run_batch(args),
        Command::Ask(args) => run_ask(args).await,
    }
}
