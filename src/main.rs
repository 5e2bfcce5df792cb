//! Kodegen Bundler Linux - native Linux packages from compiled binaries.
//!
//! This binary reads package definitions and an artifact manifest, builds
//! every requested package, and records the results in the manifest.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_linux::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
