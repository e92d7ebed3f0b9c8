// stderr logging for the CLI. Library crates log through the `log` facade;
// the fmt subscriber picks those records up as well.

use pickrecon_config::Settings;
use tracing_subscriber::EnvFilter;

pub fn init(settings: &Settings, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if verbose { "debug" } else { settings.logging.filter.as_str() };
        EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("Invalid log filter '{directive}': {e}");
            EnvFilter::new("warn")
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
