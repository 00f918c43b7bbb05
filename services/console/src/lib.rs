mod admin;
mod cli;
mod signup;
mod terminal;

use waitlist::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
