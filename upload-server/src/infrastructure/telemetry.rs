use serde::Deserialize;
use tracing::metadata::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Logging configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct TelemetryConfig {
    #[serde(default = "default_enabled")]
    pub enable: bool,
    /// Global level.
    #[serde(default)]
    pub max_level: LoggingLevel,
    /// Extra `EnvFilter` directives, e.g. `service_upload=debug`.
    #[serde(default)]
    pub level_filter: String,
    /// Environment variable the directives are read from instead.
    #[serde(default)]
    pub level_filter_env: String,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub file: FileConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable: default_enabled(),
            max_level: Default::default(),
            level_filter: Default::default(),
            level_filter_env: Default::default(),
            console: Default::default(),
            file: Default::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Debug)]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Off,
}

impl From<LoggingLevel> for LevelFilter {
    fn from(val: LoggingLevel) -> Self {
        match val {
            LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Trace => LevelFilter::TRACE,
            LoggingLevel::Off => LevelFilter::OFF,
        }
    }
}

impl From<LoggingLevel> for Directive {
    fn from(val: LoggingLevel) -> Self {
        let level: LevelFilter = val.into();
        level.into()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ConsoleConfig {
    #[serde(default = "default_enabled")]
    pub enable: bool,
    /// Print file, line, thread and target of every event.
    #[serde(default)]
    pub enable_debug_logging: bool,
    #[serde(default)]
    pub max_level: LoggingLevel,
    #[serde(default)]
    pub level_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enable: default_enabled(),
            enable_debug_logging: Default::default(),
            max_level: Default::default(),
            level_filter: Default::default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct FileConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub enable_debug_logging: bool,
    #[serde(default)]
    pub max_level: LoggingLevel,
    #[serde(default)]
    pub level_filter: String,
    /// Log directory, `./logs` by default.
    #[serde(default = "default_path")]
    pub path: String,
    /// Log file name, or prefix when rolling.
    #[serde(default = "default_filename")]
    pub prefix: String,
    #[serde(default)]
    pub rolling_time: RotationLevel,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enable: Default::default(),
            enable_debug_logging: Default::default(),
            max_level: Default::default(),
            level_filter: Default::default(),
            path: default_path(),
            prefix: default_filename(),
            rolling_time: Default::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Debug)]
pub enum RotationLevel {
    Daily,
    Hourly,
    Minutely,
    #[default]
    Never,
}

impl From<RotationLevel> for Rotation {
    fn from(val: RotationLevel) -> Self {
        match val {
            RotationLevel::Daily => Rotation::DAILY,
            RotationLevel::Hourly => Rotation::HOURLY,
            RotationLevel::Minutely => Rotation::MINUTELY,
            RotationLevel::Never => Rotation::NEVER,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "./logs".to_string()
}

fn default_filename() -> String {
    "upload-server.log".to_string()
}

fn env_filter(max_level: &LoggingLevel, directives: &str, env: Option<&str>) -> EnvFilter {
    let mut builder = EnvFilter::builder();
    if let Some(env) = env.filter(|e| !e.is_empty()) {
        builder = builder.with_env_var(env);
    }
    builder.with_default_directive(max_level.clone().into()).parse_lossy(directives)
}

pub fn initialize_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enable {
        return Ok(());
    }
    let filter = env_filter(
        &config.max_level,
        &config.level_filter,
        Some(&config.level_filter_env),
    );
    let console = config.console.enable.then(|| {
        let config = &config.console;
        let debug = config.enable_debug_logging;
        tracing_subscriber::fmt::layer()
            .with_file(debug)
            .with_line_number(debug)
            .with_thread_ids(debug)
            .with_target(debug)
            .with_filter(env_filter(&config.max_level, &config.level_filter, None))
    });
    let file = config.file.enable.then(|| {
        let config = &config.file;
        let debug = config.enable_debug_logging;
        let appender =
            RollingFileAppender::new(config.rolling_time.clone().into(), &config.path, &config.prefix);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_file(debug)
            .with_line_number(debug)
            .with_thread_ids(debug)
            .with_target(debug)
            .with_filter(env_filter(&config.max_level, &config.level_filter, None))
    });
    Registry::default().with(filter).with(console).with(file).try_init()?;
    Ok(())
}
