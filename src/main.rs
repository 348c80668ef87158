//! geofix CLI entry point
//!
//! Location resolution engine - one acquisition per invocation

use geofix::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
