use clap::{Parser, ValueEnum};
use shortly_gateway::telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "SHORTLY_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "SHORTLY_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "SHORTLY_REDIS_URL";
pub const REDIS_NAMESPACE_ENV: &str = "SHORTLY_REDIS_NAMESPACE";
pub const STATIC_DIR_ENV: &str = "SHORTLY_STATIC_DIR";
pub const LOG_FORMAT_ENV: &str = "SHORTLY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:6543";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shortly", about = "Shortly URL shortener")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    /// Prefix prepended to every Redis key, e.g. `shortly:`.
    #[arg(long, env = REDIS_NAMESPACE_ENV, default_value = "")]
    pub redis_namespace: String,

    #[arg(long, env = STATIC_DIR_ENV, default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Do not serve files under `/_static`.
    #[arg(long)]
    pub no_static: bool,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}
