//! Process-wide logger setup.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the `env_logger` backend.
///
/// `RUST_LOG` takes precedence. Without it, `verbose` selects debug output
/// and the default is info.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::from_env(Env::default().default_filter_or(level.as_str()));
    builder.format_timestamp_millis();

    // A logger may already be installed, e.g. by an earlier test.
    if builder.try_init().is_err() {
        log::debug!("logger already installed; keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(false);
        init(true);
        log::debug!("logger survives repeated init");
    }
}
