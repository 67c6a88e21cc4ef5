//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use dispatch_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = dispatch_cli::run() {
        if let CliError::ArgumentParsing(clap_err) = &err {
            // Help and version requests also arrive here.
            clap_err.exit();
        }
        eprintln!("dispatch: {err}");
        for detail in err.details() {
            eprintln!("  {detail}");
        }
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
