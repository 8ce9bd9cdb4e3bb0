//! Application configuration management.
//!
//! The database to open is named on the command line:
//!
//! ```text
//! hotelctl <dbname> <port> <user>
//! ```
//!
//! Everything else the connection step needs has a default that can be
//! overridden through `HOTELCTL_`-prefixed environment variables.
//!
//! ## Loading Priority
//!
//! Sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **Defaults** - `localhost`, empty password, 1000ms slow statement threshold
//! 2. **Environment variables** - `HOTELCTL_HOST`, `HOTELCTL_PASSWORD`,
//!    `HOTELCTL_SLOW_STATEMENT_THRESHOLD_MS`
//! 3. **Positional arguments** - database name, port and user
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use hotelctl::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Connecting to {}", config.database.display_url());
//! # Ok(())
//! # }
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Environment variables read on top of the positional arguments (without prefix)
const ENV_KEYS: [&str; 3] = ["host", "password", "slow_statement_threshold_ms"];

/// Positional CLI arguments. Missing or extra arguments make clap print the
/// usage line and exit with a non-zero status.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name of the PostgreSQL database holding the hotel schema
    pub dbname: String,

    /// Port the PostgreSQL server listens on
    pub port: u16,

    /// Database role to connect as
    pub user: String,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Connection settings for the single database session
    pub database: DatabaseConfig,
}

/// Connection settings for the PostgreSQL session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    /// Database name
    pub name: String,
    pub user: String,
    pub password: String,
    /// Threshold in milliseconds above which sqlx logs a statement at WARN
    pub slow_statement_threshold_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: String::new(),
            user: String::new(),
            password: String::new(),
            slow_statement_threshold_ms: 1000,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL for logs and the startup banner; never includes the password.
    pub fn display_url(&self) -> String {
        format!("postgresql://{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

impl Config {
    /// Load configuration from defaults, the environment, and the CLI arguments.
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(figment::Error::from)?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(
                Env::prefixed("HOTELCTL_")
                    .only(&ENV_KEYS)
                    .map(|key| format!("database.{key}").into()),
            )
            .merge(Serialized::default("database.name", &args.dbname))
            .merge(Serialized::default("database.port", args.port))
            .merge(Serialized::default("database.user", &args.user))
    }

    /// Validate the configuration for required fields
    pub fn validate(&self) -> Result<(), String> {
        if self.database.name.trim().is_empty() {
            return Err("Config validation: database name must not be empty".to_string());
        }
        if self.database.user.trim().is_empty() {
            return Err("Config validation: database user must not be empty".to_string());
        }
        if self.database.port == 0 {
            return Err("Config validation: database port must be non-zero".to_string());
        }
        Ok(())
    }
}
