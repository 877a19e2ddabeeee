use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use neoforge_lock::{commands, init_logging, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match commands::update(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Lock update failed: {e}");
            ExitCode::FAILURE
        }
    }
}
