mod cli;
mod infra;
mod routes;
mod server;
mod simulate;

use fincoach::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
