//! User registration and credential checks.
//!
//! - [`register`]: create a customer account and report its generated ID
//! - [`login`]: check a `(userID, password)` pair and open a [`Session`]
//! - [`is_manager`]: look up whether a user currently has the manager type
//!
//! Login failures are reported with a single message whether the user does
//! not exist, the password is wrong, or the ID is not even a number.

use tracing::{info, instrument};

use crate::console::Console;
use crate::db::errors::DbError;
use crate::db::gateway::{Gateway, Statement};
use crate::errors::Result;
use crate::session::Session;
use crate::types::{UserId, UserType};

/// Sequence backing `Users.userID`
pub const USERS_SEQUENCE: &str = "users_userID_seq";

pub const INVALID_CREDENTIALS: &str = "Not a valid user. Please try again.";

/// Insert a customer account and return the ID the database assigned to it.
#[instrument(skip(gw, password), err)]
pub async fn create_user(gw: &mut dyn Gateway, name: &str, password: &str) -> Result<UserId> {
    let insert = Statement::new("INSERT INTO Users (name, password, userType) VALUES ($1, $2, $3)")
        .bind(name)
        .bind(password)
        .bind(UserType::Customer.as_str());
    gw.execute(&insert).await?;

    // currval is per-session, so this reads the ID generated by the insert above
    let id = gw.current_sequence_value(USERS_SEQUENCE).await?;
    let user_id = UserId::try_from(id)
        .map_err(|_| DbError::Other(anyhow::anyhow!("{USERS_SEQUENCE} returned out-of-range value {id}")))?;
    info!(user_id, "User created");
    Ok(user_id)
}

/// Whether a `(userID, password)` pair matches a stored user.
#[instrument(skip(gw, password), err)]
pub async fn check_credentials(gw: &mut dyn Gateway, user_id: UserId, password: &str) -> Result<bool> {
    let query = Statement::new("SELECT * FROM Users WHERE userID = $1 AND password = $2")
        .bind(user_id)
        .bind(password);
    Ok(gw.count(&query).await? > 0)
}

/// Whether `user_id` currently has the manager type.
#[instrument(skip(gw), err)]
pub async fn is_manager(gw: &mut dyn Gateway, user_id: UserId) -> Result<bool> {
    let query = Statement::new("SELECT * FROM Users WHERE userID = $1 AND userType = $2")
        .bind(user_id)
        .bind(UserType::Manager.as_str());
    Ok(gw.count(&query).await? > 0)
}

/// Interactive registration: prompt for a name and password, create the user.
pub async fn register(gw: &mut dyn Gateway, console: &mut Console) -> Result<UserId> {
    let name = console.prompt("Enter name")?;
    let password = console.prompt("Enter password")?;

    let user_id = create_user(gw, &name, &password).await?;
    console.line(&format!("User successfully created with userID = {user_id}"))?;
    Ok(user_id)
}

/// Interactive login. Returns the new session, or `None` after printing the
/// invalid-credentials message.
pub async fn login(gw: &mut dyn Gateway, console: &mut Console) -> Result<Option<Session>> {
    let raw_id = console.prompt("Enter userID")?;
    let password = console.prompt("Enter password")?;

    let valid = match raw_id.trim().parse::<UserId>() {
        Ok(id) => check_credentials(gw, id, &password).await?.then_some(id),
        Err(_) => None,
    };
    let Some(user_id) = valid else {
        info!("Login rejected");
        console.line(&format!("\t{INVALID_CREDENTIALS}"))?;
        return Ok(None);
    };

    let manager = is_manager(gw, user_id).await?;
    info!(user_id, manager, "User logged in");
    Ok(Some(Session::new(user_id, manager)))
}
