//! Logging Config

use clap::Args;

/// Dependencies whose `info` output drowns out request logs.
const QUIET_TARGETS: [&str; 6] = [
    "sqlx=warn",
    "h2=warn",
    "hyper=warn",
    "tower=warn",
    "tonic=warn",
    "opentelemetry=warn",
];

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs, one object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log filter, either a level or full `tracing` directives
    /// (e.g. `info,shopfront_app=debug`)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl LoggingConfig {
    /// Filter directives with noisy dependencies turned down, unless the
    /// configured filter already names them.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![self.log_level.trim().to_string()];

        for quiet in QUIET_TARGETS {
            let target = quiet.split_once('=').map_or(quiet, |(target, _level)| target);

            let already_set = self
                .log_level
                .split(',')
                .any(|directive| directive.trim().starts_with(target));

            if !already_set {
                directives.push(quiet.to_string());
            }
        }

        directives.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> LoggingConfig {
        LoggingConfig {
            log_level: log_level.to_string(),
            log_format: LogFormat::Compact,
        }
    }

    #[test]
    fn plain_level_gets_quiet_dependencies() {
        let directives = config("debug").filter_directives();

        assert!(directives.starts_with("debug,"), "{directives}");
        assert!(directives.contains("sqlx=warn"), "{directives}");
        assert!(directives.contains("hyper=warn"), "{directives}");
    }

    #[test]
    fn explicit_dependency_level_is_kept() {
        let directives = config("info,sqlx=debug").filter_directives();

        assert!(directives.contains("sqlx=debug"), "{directives}");
        assert!(!directives.contains("sqlx=warn"), "{directives}");
        assert!(directives.contains("tonic=warn"), "{directives}");
    }
}
