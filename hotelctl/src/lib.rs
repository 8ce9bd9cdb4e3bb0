//! # hotelctl: console front-end for a hotel reservation database
//!
//! `hotelctl` is an interactive, menu-driven terminal client for a PostgreSQL
//! database holding hotels, rooms, bookings, room update logs and repair
//! requests. Customers register, log in, look up nearby hotels, check room
//! availability and book rooms. Managers additionally edit rooms of hotels
//! they run, review booking and update history, list their regular customers
//! and file repair requests with maintenance companies.
//!
//! ## Architecture
//!
//! The program holds one database connection and serves one user at a time.
//!
//! - The **gateway** ([`db`]) is the only component that talks to PostgreSQL.
//!   Handlers describe what to run as a parameterized
//!   [`Statement`](db::gateway::Statement) and pick a primitive: execute,
//!   count, fetch rows, print as a table, or read a sequence value.
//! - **Auth** ([`auth`]) creates users and checks credentials, producing a
//!   [`Session`](session::Session) that carries the caller's identity.
//! - The **operation catalog** ([`operations`]) holds one handler per menu
//!   item. Each re-checks authorization against the database before acting.
//! - The **menu** ([`menu`]) is a two-state loop (logged out / logged in)
//!   that dispatches choices and keeps going when a handler fails.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use hotelctl::{Application, Config, console::Console};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let args = hotelctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     hotelctl::telemetry::init_telemetry()?;
//!
//!     let mut console = Console::stdio();
//!     Application::connect(config, &mut console).await?.run(&mut console).await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod menu;
pub mod operations;
pub mod session;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use anyhow::Context;
use tracing::{debug, info, warn};

pub use config::Config;

use crate::console::Console;
use crate::db::gateway::Gateway;
use crate::db::postgres::PgGateway;
use crate::menu::Menu;

/// A connected client session.
///
/// 1. **Connect**: [`Application::connect`] opens the database session
/// 2. **Run**: [`Application::run`] drives the menu until the user exits or
///    input ends, then closes the connection
pub struct Application<G: Gateway = PgGateway> {
    gateway: G,
}

impl Application<PgGateway> {
    /// Open the database session described by `config`, announcing it on the console.
    ///
    /// On failure a hint is written to the error stream and the error is returned.
    pub async fn connect(config: Config, console: &mut Console) -> anyhow::Result<Self> {
        let url = config.database.display_url();
        debug!(%url, "Connecting");
        console.line("Connecting to database...")?;
        console.line(&format!("Connection URL: {url}"))?;

        match PgGateway::connect(&config.database).await {
            Ok(gateway) => {
                console.line("Done")?;
                Ok(Self::with_gateway(gateway))
            }
            Err(e) => {
                console.error_line(&format!("Error - Unable to connect to database: {}", e.user_message()))?;
                console.error_line("Make sure you started postgres on this machine")?;
                Err(e).with_context(|| format!("failed to connect to {url}"))
            }
        }
    }
}

impl<G: Gateway> Application<G> {
    /// Build an application over any gateway.
    pub fn with_gateway(gateway: G) -> Self {
        Self { gateway }
    }

    /// Run the interactive session, then disconnect.
    pub async fn run(&mut self, console: &mut Console) -> anyhow::Result<()> {
        let outcome = Menu::new(&mut self.gateway, console).run().await;

        console.say("Disconnecting from database...")?;
        if let Err(e) = self.gateway.close().await {
            warn!(error = %e, "Error while closing database connection");
        }
        console.line("Done\n\nBye !")?;
        info!("Session finished");

        outcome.context("interactive session failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCall, MockGateway, scripted_console};

    #[test_log::test(tokio::test)]
    async fn test_run_closes_connection_and_says_bye() {
        let (mut console, out, _err) = scripted_console(&["9"]);
        let mut app = Application::with_gateway(MockGateway::new());

        app.run(&mut console).await.unwrap();

        assert!(out.contents().ends_with("Disconnecting from database...Done\n\nBye !\n"));
        assert_eq!(app.gateway.calls(), &[MockCall::Close]);
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_connect_prints_banner_and_hint() {
        let mut config = Config::default();
        config.database.host = "127.0.0.1".to_string();
        config.database.port = 1;
        config.database.name = "hotels".to_string();
        config.database.user = "mona".to_string();
        config.database.password = "secret".to_string();
        let (mut console, out, err) = scripted_console(&[]);

        let result = Application::connect(config, &mut console).await;

        assert!(result.is_err());
        let out = out.contents();
        assert!(out.contains("Connecting to database..."));
        assert!(out.contains("Connection URL: postgresql://mona@127.0.0.1:1/hotels"));
        assert!(!out.contains("secret"));
        assert!(!out.contains("Done"));
        assert!(err.contents().contains("Make sure you started postgres on this machine"));
    }

    #[test_log::test(tokio::test)]
    async fn test_closed_input_still_disconnects() {
        let (mut console, out, _err) = scripted_console(&["2", "7"]);
        let mut app = Application::with_gateway(MockGateway::new());

        app.run(&mut console).await.unwrap();

        assert!(out.contents().contains("Bye !"));
        assert_eq!(app.gateway.calls().last(), Some(&MockCall::Close));
    }
}
