mod cli;
mod commands;

use listing_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
