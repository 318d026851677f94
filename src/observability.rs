use std::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Logging knobs, read before anything else so config errors are logged too.
///
/// `FR_LOG_LEVEL` / `FR_LOG_FORMAT` win over the unprefixed `LOG_LEVEL` /
/// `LOG_FORMAT`. `RUST_LOG`, when set, replaces the level filter entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
    /// Format value that was set but not understood; reported after init.
    pub rejected_format: Option<String>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |primary: &str, fallback: &str| {
            lookup(primary)
                .or_else(|| lookup(fallback))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let level = pick("FR_LOG_LEVEL", "LOG_LEVEL").unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let (format, rejected_format) = match pick("FR_LOG_FORMAT", "LOG_FORMAT") {
            None => (LogFormat::Pretty, None),
            Some(raw) => match LogFormat::parse(&raw) {
                Some(format) => (format, None),
                None => (LogFormat::Pretty, Some(raw)),
            },
        };

        Self {
            level,
            format,
            rejected_format,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber. `log` records are bridged through it.
pub fn init_logging(settings: &LogSettings) {
    let registry = tracing_subscriber::registry().with(settings.filter());
    let layer = tracing_subscriber::fmt::layer().with_target(true);

    match settings.format {
        LogFormat::Json => registry
            .with(
                layer
                    .json()
                    .with_thread_ids(true)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init(),
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Pretty => registry.with(layer.pretty()).init(),
    }

    if let Some(raw) = &settings.rejected_format {
        tracing::warn!(value = %raw, "Unknown log format, using pretty");
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %settings.level,
        format = %settings.format,
        "feedrelay logging ready"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogSettings::from_lookup(|key: &str| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.level, "info");
        assert_eq!(s.format, LogFormat::Pretty);
        assert_eq!(s.rejected_format, None);
    }

    #[test]
    fn test_prefixed_vars_win() {
        let s = settings(&[
            ("LOG_LEVEL", "warn"),
            ("FR_LOG_LEVEL", "feedrelay=debug"),
            ("LOG_FORMAT", "pretty"),
            ("FR_LOG_FORMAT", " JSON "),
        ]);
        assert_eq!(s.level, "feedrelay=debug");
        assert_eq!(s.format, LogFormat::Json);
    }

    #[test]
    fn test_unprefixed_fallback() {
        let s = settings(&[("LOG_LEVEL", "trace"), ("LOG_FORMAT", "compact")]);
        assert_eq!(s.level, "trace");
        assert_eq!(s.format, LogFormat::Compact);
    }

    #[test]
    fn test_unknown_format_falls_back_to_pretty() {
        let s = settings(&[("FR_LOG_FORMAT", "xml")]);
        assert_eq!(s.format, LogFormat::Pretty);
        assert_eq!(s.rejected_format.as_deref(), Some("xml"));
    }

    #[test]
    fn test_blank_level_uses_default() {
        let s = settings(&[("FR_LOG_LEVEL", "  ")]);
        assert_eq!(s.level, "info");
    }
}
