//! # `cmdchain`
//!
//! Runs several chained commands from one command line. Each command takes
//! the options that follow its name; all of them run concurrently and the
//! process exits once every one has finished.
//!
//! ```sh
//! cmdchain [global_options] [command [command_options]]...
//! cmdchain print --message hello sleep --millis 200 --message bye
//! ```
//!
//! Exit status is 0 even when a command fails while running (the failure is
//! logged). An unknown command name exits with 2, invalid command options
//! with 3 and configuration problems with 1.

use cmdchain::commands::builtin_registry;
use cmdchain::error::ChainError;
use cmdchain::system::{RealSystem, System as _};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let system = RealSystem::new();
    let registry = builtin_registry();
    let args = cmdchain::cli::parse_from(system.args(), &registry).unwrap_or_else(|err| err.exit());

    let config = cmdchain::load_config(&args, &system);

    // Initialize tracing subscriber: RUST_LOG, then --verbose, then config
    let log_level = if args.verbose {
        "debug".to_owned()
    } else {
        config
            .as_ref()
            .ok()
            .and_then(|config| config.log_level.clone())
            .unwrap_or_else(|| "info".to_owned())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let result = config.and_then(|config| cmdchain::run(&args, &config, &registry));
    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            if let Some(ChainError::HelpRequested { text, .. }) = err.downcast_ref::<ChainError>() {
                print!("{text}");
                std::process::exit(0);
            }
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<ChainError>()
                    .map_or(1, ChainError::exit_code),
            );
        }
    }
}
