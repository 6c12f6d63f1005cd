use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` names one. GPU
/// crates are noisy at info level, so they are held to warnings.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses `env_logger` syntax, e.g. "limner_engine=debug,wgpu=warn".
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Effective filter: explicit config, then `rust_log`, then the default.
    pub fn resolve_filter(&self, rust_log: Option<&str>) -> String {
        self.env_filter
            .as_deref()
            .or(rust_log)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FILTER)
            .to_string()
    }
}

static INIT: Once = Once::new();

/// Installs the global logger on first call; later calls are ignored.
///
/// A logger installed by the host beforehand is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = config.resolve_filter(rust_log.as_deref());

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .try_init()
            .is_ok();

        if installed {
            log::debug!("logging initialized ({filter})");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let c = LoggingConfig {
            env_filter: Some("debug".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(c.resolve_filter(Some("warn")), "debug");
    }

    #[test]
    fn rust_log_then_default() {
        let c = LoggingConfig::default();
        assert_eq!(c.resolve_filter(Some("warn")), "warn");
        assert_eq!(c.resolve_filter(None), DEFAULT_FILTER);
        assert_eq!(c.resolve_filter(Some(" ")), DEFAULT_FILTER);
    }
}
