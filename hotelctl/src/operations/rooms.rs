//! Manager edits to room data, with an audit row per edit.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::console::Console;
use crate::db::gateway::{Gateway, Statement, Value};
use crate::errors::{Error, Result};
use crate::operations::bookings::RECENT_LIMIT;
use crate::operations::{Outcome, Rejection, owns_hotel, require_manager};
use crate::session::Session;
use crate::types::{HotelId, RoomField, RoomNumber, UserId};

/// Coerce the raw answer to the type stored in `field`.
fn field_value(field: RoomField, raw: String) -> Result<Value> {
    match field {
        RoomField::Price => raw
            .trim()
            .parse::<Decimal>()
            .map(Value::from)
            .map_err(|_| Error::invalid_input("price", raw)),
        RoomField::ImageUrl => Ok(Value::from(raw)),
    }
}

pub fn update_room_statement(field: RoomField, value: Value, hotel_id: HotelId, room_number: RoomNumber) -> Statement {
    // column names cannot be bound, so they come from the closed RoomField set
    Statement::new(format!(
        "UPDATE Rooms SET {} = $1 WHERE hotelID = $2 AND roomNumber = $3",
        field.column()
    ))
    .bind(value)
    .bind(hotel_id)
    .bind(room_number)
}

pub fn audit_statement(manager: UserId, hotel_id: HotelId, room_number: RoomNumber) -> Statement {
    Statement::new("INSERT INTO RoomUpdatesLog (managerID, hotelID, roomNumber, updatedOn) VALUES ($1, $2, $3, NOW())")
        .bind(manager)
        .bind(hotel_id)
        .bind(room_number)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn update_room_info(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    if let Some(rejection) = require_manager(gw, session).await? {
        return Ok(Outcome::Rejected(rejection));
    }

    let hotel_id: HotelId = console.prompt_parsed("Enter Hotel ID", "hotel ID")?;
    let room_number: RoomNumber = console.prompt_parsed("Enter Room Number", "room number")?;
    if !owns_hotel(gw, session.user_id(), hotel_id).await? {
        return Ok(Outcome::Rejected(Rejection::NotHotelManager));
    }

    console.line("\tWhat part of the room would you like to edit? 1. price 2. imageURL ")?;
    let choice = console.read_line()?;
    console.line("\tWhat would you like the new value to be?")?;
    let raw_value = console.read_line()?;

    let Ok(field) = choice.parse::<RoomField>() else {
        return Ok(Outcome::Rejected(Rejection::UnknownOption));
    };
    let value = field_value(field, raw_value)?;

    let what = match field {
        RoomField::Price => "Price",
        RoomField::ImageUrl => "Image",
    };
    console.line(&format!("\tUpdating Room {what}"))?;

    let updated = gw
        .execute(&update_room_statement(field, value, hotel_id, room_number))
        .await?;
    if updated == 0 {
        return Ok(Outcome::Rejected(Rejection::NoSuchRoom));
    }
    gw.execute(&audit_statement(session.user_id(), hotel_id, room_number))
        .await?;
    info!(hotel_id, room_number, field = field.column(), "Room updated");

    console.line(&format!("Successfully Updated Room {what}"))?;
    Ok(Outcome::Done)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn view_recent_updates(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    if let Some(rejection) = require_manager(gw, session).await? {
        return Ok(Outcome::Rejected(rejection));
    }

    let query = Statement::new("SELECT * FROM RoomUpdatesLog U WHERE U.managerID = $1 ORDER BY U.updatedOn DESC LIMIT $2")
        .bind(session.user_id())
        .bind(RECENT_LIMIT);
    gw.execute_and_print(&query, console.out()).await?;
    Ok(Outcome::Done)
}
