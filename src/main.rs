use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use fileguard::cli::{parse_args, run_cli_command};

/// Environment variable holding the log filter (e.g. `debug`, `fileguard=trace`).
const LOG_ENV: &str = "FILEGUARD_LOG";

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("fileguard: {}", err.user_message());
            eprintln!("Run `fileguard --help` for usage.");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_cli_command(&args) {
        tracing::error!("[{}] {}", err.error_code(), err);
        eprintln!("Error: {}", err.user_message());
        eprintln!("{}", err.recovery_hint());
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
