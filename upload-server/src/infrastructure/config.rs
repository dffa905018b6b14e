use getset::Getters;
use serde::Deserialize;

use super::telemetry::TelemetryConfig;

#[derive(Default, Deserialize, Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct UploadConfig {
    #[serde(default)]
    host: HostConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    telemetry: TelemetryConfig,
}

#[derive(Deserialize, Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct HostConfig {
    #[serde(default = "HostConfig::default_address")]
    bind_address: String,
    #[serde(default = "HostConfig::default_port")]
    bind_port: u16,
    /// Limit of a whole multipart request.
    #[serde(default = "HostConfig::default_max_body_bytes")]
    max_body_bytes: usize,
    /// Where received chunks are buffered before staging.
    #[serde(default = "HostConfig::default_temp_dir")]
    temp_dir: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: Self::default_address(),
            bind_port: Self::default_port(),
            max_body_bytes: Self::default_max_body_bytes(),
            temp_dir: Self::default_temp_dir(),
        }
    }
}

impl HostConfig {
    fn default_address() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8080
    }
    fn default_max_body_bytes() -> usize {
        100 * 1024 * 1024
    }
    fn default_temp_dir() -> String {
        "tmp".to_string()
    }
}

#[derive(Deserialize, Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct StorageConfig {
    /// Directory holding artifacts, staging directories and the index.
    #[serde(default = "StorageConfig::default_root")]
    root: String,
    #[serde(default = "StorageConfig::default_index_file")]
    index_file: String,
    #[serde(default = "StorageConfig::default_sweep_on_startup")]
    sweep_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            index_file: Self::default_index_file(),
            sweep_on_startup: Self::default_sweep_on_startup(),
        }
    }
}

impl StorageConfig {
    fn default_root() -> String {
        "uploads".to_string()
    }
    fn default_index_file() -> String {
        "md5.db".to_string()
    }
    fn default_sweep_on_startup() -> bool {
        true
    }
}

/// `config.yaml` in the working directory, then yaml files named on the command
/// line, then `UPLOAD__*` environment variables.
pub fn build_config() -> anyhow::Result<UploadConfig> {
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for arg in std::env::args().skip(1) {
        if arg.ends_with("yaml") || arg.ends_with("yml") {
            config = config.add_source(
                config::File::from(std::path::Path::new(arg.as_str()))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }
    }
    config = config.add_source(
        config::Environment::with_prefix("UPLOAD").separator("__").try_parsing(true),
    );
    Ok(config.build()?.try_deserialize()?)
}
