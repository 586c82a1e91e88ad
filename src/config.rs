use crate::service::ExhaustedLinePolicy;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 默认配置文件名 (不带扩展名, 支持 toml/json/yaml)
pub const DEFAULT_CONFIG_FILE: &str = "receiving";
/// 环境变量前缀, 例如 `RECEIVING__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "RECEIVING";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reconcile: ReconcileConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub exhausted_line_policy: ExhaustedLinePolicy,
}

/// 对账结果输出 (取代原先隐式的 ./tmp 目录)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub write_json: bool,
    pub write_manifest: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            reconcile: ReconcileConfig::default(),
            output: OutputConfig {
                dir: PathBuf::from("./out"),
                write_json: true,
                write_manifest: true,
            },
        }
    }
}

impl AppConfig {
    /// 默认值 -> 配置文件 (可选) -> 环境变量
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 从环境变量加载配置; `RECEIVING_CONFIG` 可指定配置文件路径
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("RECEIVING_CONFIG") {
            Ok(path) => Self::load(Some(Path::new(&path))),
            Err(_) => Self::load(None),
        }
    }
}
