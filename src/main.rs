use std::env;

use tracing_subscriber::EnvFilter;

/// Log filter variable; `RUST_LOG` is the fallback.
const LOG_ENV: &str = "RINKPLAN_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {err}");
    }
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();
    std::process::exit(rinkplan::cli::run_with_args(&args));
}
