use std::io::Write;

use env_logger::{Builder, Env};
use log::{LevelFilter, SetLoggerError};

/// Default filter for a `-v` count; `RUST_LOG` still takes precedence
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the process logger
///
/// With `enabled` false every record is discarded.
pub fn init(verbosity: u8, enabled: bool) -> Result<(), SetLoggerError> {
    let mut builder = if enabled {
        Builder::from_env(Env::default().default_filter_or(level_for_verbosity(verbosity)))
    } else {
        let mut builder = Builder::new();
        builder.filter_level(LevelFilter::Off);
        builder
    };

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }
}
