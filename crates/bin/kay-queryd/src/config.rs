use clap::Parser;
use kay_core::store::PgStoreOptions;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "info";
const POSTGRES_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];

#[derive(Parser, Debug)]
#[command(
    name = "kay-queryd",
    version,
    about = "Read-only MCP query gateway for KAY."
)]
struct CliArgs {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[arg(
        long,
        env = "KAY_DB_MAX_CONNECTIONS",
        default_value_t = DEFAULT_MAX_CONNECTIONS
    )]
    max_connections: u32,

    #[arg(
        long,
        env = "KAY_DB_ACQUIRE_TIMEOUT_SECS",
        default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS
    )]
    acquire_timeout_secs: u64,

    #[arg(long = "log", env = "KAY_LOG", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct KayConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub log_filter: String,
}

impl fmt::Debug for KayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KayConfig")
            .field("database_url", &"***")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl KayConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    pub fn store_options(&self) -> PgStoreOptions {
        PgStoreOptions::new(self.database_url.clone())
            .with_max_connections(self.max_connections)
            .with_acquire_timeout(self.acquire_timeout)
    }
}

impl TryFrom<CliArgs> for KayConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let database_url = args
            .database_url
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingSetting("DATABASE_URL"))?;

        if !POSTGRES_SCHEMES
            .iter()
            .any(|scheme| database_url.starts_with(scheme))
        {
            // Never echo the URL back; it carries credentials.
            return Err(ConfigError::InvalidSetting {
                name: "DATABASE_URL",
                value: "expected a postgres:// or postgresql:// URL".to_string(),
            });
        }

        if args.max_connections == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "KAY_DB_MAX_CONNECTIONS",
                value: args.max_connections.to_string(),
            });
        }

        if args.acquire_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "KAY_DB_ACQUIRE_TIMEOUT_SECS",
                value: args.acquire_timeout_secs.to_string(),
            });
        }

        if args.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "KAY_LOG",
                value: args.log_filter,
            });
        }

        Ok(Self {
            database_url,
            max_connections: args.max_connections,
            acquire_timeout: Duration::from_secs(args.acquire_timeout_secs),
            log_filter: args.log_filter,
        })
    }
}
