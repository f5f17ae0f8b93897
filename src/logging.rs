//! Logger set-up shared by the simulation binary and the tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Modules that log every tile a vehicle crosses.
const CHATTY: [&str; 2] = ["trundle::movement", "trundle::vehicle"];

/// Installs `env_logger` as the global logger.
///
/// Verbose runs show debug output from the movement and vehicle modules;
/// otherwise those are held to warnings while the rest of the crate logs at
/// info. `RUST_LOG` replaces both defaults. A second call leaves the first
/// logger in place.
pub fn init(verbose: bool) {
    let chatty = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let filter = CHATTY
        .iter()
        .fold(String::from("info"), |acc, module| format!("{acc},{module}={chatty}"));

    let mut builder = Builder::from_env(Env::default().default_filter_or(filter));
    builder.format_timestamp(None).format_module_path(verbose);
    if builder.try_init().is_err() {
        log::debug!("logger already installed");
    }
}
