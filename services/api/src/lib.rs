mod cli;
mod infra;
mod routes;
mod server;

use zac::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
