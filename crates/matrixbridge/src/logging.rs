use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Bridge crates log at the selected level; everything else stays at
/// `warn` so dependency noise never drowns frame traffic.
fn filter_directives(level: LogLevel) -> String {
    let level = level.directive();
    format!(
        "warn,matrixbridge={level},matrixbridge_wire={level},\
         matrixbridge_pixel={level},matrixbridge_pipeline={level}"
    )
}

/// Initialize stderr logging. `RUST_LOG`, when set, overrides the
/// `--log-level` derived directives wholesale.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_crates_follow_selected_level() {
        let directives = filter_directives(LogLevel::Debug);
        assert!(directives.starts_with("warn,"));
        for target in [
            "matrixbridge",
            "matrixbridge_wire",
            "matrixbridge_pixel",
            "matrixbridge_pipeline",
        ] {
            assert!(directives.contains(&format!("{target}=debug")));
        }
    }

    #[test]
    fn directives_parse_as_a_filter() {
        for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
            assert!(EnvFilter::try_new(filter_directives(level)).is_ok());
        }
    }
}
