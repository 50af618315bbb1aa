mod cli;
mod infra;
mod matching;
mod routes;
mod server;

use placement::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
