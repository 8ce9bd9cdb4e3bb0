//! The interactive menu loop.
//!
//! Two states: logged out, where the user can register, log in or exit, and
//! logged in with a [`Session`], where the operation catalog is offered.
//! Every handler runs behind an error boundary: a failed handler is logged,
//! reported on the error stream, and the loop carries on. The loop ends when
//! the user exits or stdin is closed.

use tracing::{debug, info};

use crate::auth;
use crate::console::Console;
use crate::db::gateway::Gateway;
use crate::errors::{Error, Result};
use crate::operations::{Operation, Outcome};
use crate::session::Session;

pub const CREATE_USER: i64 = 1;
pub const LOG_IN: i64 = 2;
pub const EXIT: i64 = 9;
pub const LOG_OUT: i64 = 20;

const GREETING: &str = "\n\n*******************************************************\n              User Interface      \t               \n*******************************************************\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Unauthenticated,
    Authenticated(Session),
}

pub struct Menu<'a> {
    gw: &'a mut dyn Gateway,
    console: &'a mut Console,
    state: MenuState,
}

impl<'a> Menu<'a> {
    pub fn new(gw: &'a mut dyn Gateway, console: &'a mut Console) -> Self {
        Self {
            gw,
            console,
            state: MenuState::Unauthenticated,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Drive the session until the user exits or input runs out.
    pub async fn run(&mut self) -> Result<()> {
        self.console.line(GREETING)?;
        loop {
            let keep_going = match self.state {
                MenuState::Unauthenticated => self.main_menu().await,
                MenuState::Authenticated(session) => self.user_menu(session).await,
            };
            match keep_going {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(Error::EndOfInput) => {
                    info!("Input closed, ending session");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One round of the logged-out menu. Returns `false` on exit.
    async fn main_menu(&mut self) -> Result<bool> {
        self.console.line("MAIN MENU")?;
        self.console.line("---------")?;
        self.console.line(&format!("{CREATE_USER}. Create user"))?;
        self.console.line(&format!("{LOG_IN}. Log in"))?;
        self.console.line(&format!("{EXIT}. < EXIT"))?;

        match self.console.read_choice()? {
            CREATE_USER => {
                let result = auth::register(self.gw, self.console).await.map(|_| ());
                self.guard(result)?;
            }
            LOG_IN => {
                let result = auth::login(self.gw, self.console).await;
                if let Some(session) = self.guard(result)?.flatten() {
                    self.state = MenuState::Authenticated(session);
                }
            }
            EXIT => return Ok(false),
            _ => self.console.line("Unrecognized choice!")?,
        }
        Ok(true)
    }

    /// One round of the logged-in menu.
    async fn user_menu(&mut self, session: Session) -> Result<bool> {
        self.console.line("MAIN MENU")?;
        self.console.line("---------")?;
        for op in Operation::ALL {
            if !op.manager_only() || session.is_manager() {
                self.console.line(&op.to_string())?;
            }
        }
        self.console.line(".........................")?;
        self.console.line(&format!("{LOG_OUT}. Log out"))?;

        let choice = self.console.read_choice()?;
        if choice == LOG_OUT {
            info!(user_id = session.user_id(), "User logged out");
            self.state = MenuState::Unauthenticated;
            return Ok(true);
        }

        // manager items stay reachable by number; the handler refuses non-managers
        match Operation::from_choice(choice) {
            Some(op) => {
                let result = op.run(self.gw, self.console, &session).await;
                if let Some(Outcome::Rejected(rejection)) = self.guard(result)? {
                    debug!(?op, %rejection, "Operation rejected");
                    self.console.line(&format!("\t{rejection}"))?;
                }
            }
            None => self.console.line("Unrecognized choice!")?,
        }
        Ok(true)
    }

    /// Error boundary around a handler: report the failure and keep the loop
    /// alive. Only a closed input is passed on.
    fn guard<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Error::EndOfInput) => Err(Error::EndOfInput),
            Err(e) => {
                e.log();
                self.console.error_line(&e.user_message())?;
                Ok(None)
            }
        }
    }
}
