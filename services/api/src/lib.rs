mod cli;
mod infra;
mod routes;
mod server;
mod simulate;

use settlement_impact::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
