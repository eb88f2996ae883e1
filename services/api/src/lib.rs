mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use loan_assistant::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
