//! Translation parity check - compares the structure of every post that
//! exists in both languages and flags the ones that drifted apart
//!
//! Usage:
//!   cargo run --bin check-parity
//!
//! Optional environment variables:
//! - CONTENT_ROOT (defaults to content/posts)
//!
//! Exit status: 0 when every pair matches, 1 when any pair is flagged,
//! 2 when the content could not be read.

use blog_content::config::Config;
use blog_content::parity;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

fn main() -> ExitCode {
    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LevelFilter::WARN.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match parity::check_parity(&config.content_root) {
        Ok(report) => {
            print!("{}", report.render());
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            error!("Parity check failed: {}", e);
            ExitCode::from(2)
        }
    }
}
