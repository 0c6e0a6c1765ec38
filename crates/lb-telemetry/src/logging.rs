use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Filter directive for a configured level raised by `-v` flags.
///
/// `verbosity` 0 keeps `level`, 1 means `debug`, 2 or more means `trace`.
/// An empty level falls back to `info`.
pub fn filter_directive(level: &str, verbosity: u8) -> String {
    match verbosity {
        0 => {
            let level = level.trim();
            if level.is_empty() {
                "info".to_string()
            } else {
                level.to_string()
            }
        }
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Initialize logging on stderr so command output on stdout stays clean.
///
/// `RUST_LOG` wins when set, otherwise `default_level` is used
/// (e.g. "info", "debug", "lb_core=debug,warn").
///
/// Safe to call multiple times (e.g. in tests); subsequent calls are no-ops.
/// Returns whether this call installed the subscriber.
pub fn init_logging(service_name: &str, default_level: &str, format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Human => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .try_init()
            .is_ok(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(service = service_name, ?format, "logging initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config_level() {
        assert_eq!(filter_directive("warn", 0), "warn");
        assert_eq!(filter_directive("warn", 1), "debug");
        assert_eq!(filter_directive("warn", 2), "trace");
        assert_eq!(filter_directive("warn", 7), "trace");
    }

    #[test]
    fn blank_level_means_info() {
        assert_eq!(filter_directive("  ", 0), "info");
        assert_eq!(filter_directive("lb_core=debug,warn", 0), "lb_core=debug,warn");
    }
}
