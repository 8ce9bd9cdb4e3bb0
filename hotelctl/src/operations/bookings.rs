//! Room bookings: placing one, and the customer and manager views over them.

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::console::Console;
use crate::db::gateway::{Gateway, Statement};
use crate::errors::Result;
use crate::operations::{Outcome, Rejection, owns_hotel, require_manager};
use crate::session::Session;
use crate::types::{HotelId, RoomNumber, UserId};

/// How many rows the "recent" and "regular customers" views show.
pub const RECENT_LIMIT: i64 = 5;

pub fn booking_exists_query(hotel_id: HotelId, room_number: RoomNumber, date: NaiveDate) -> Statement {
    Statement::new("SELECT * FROM RoomBookings B WHERE B.hotelID = $1 AND B.roomNumber = $2 AND B.bookingDate = $3")
        .bind(hotel_id)
        .bind(room_number)
        .bind(date)
}

pub fn recent_bookings_query(customer: UserId) -> Statement {
    Statement::new(
        "SELECT B.hotelID, B.roomNumber, R.price, B.bookingDate \
         FROM RoomBookings B, Rooms R \
         WHERE R.roomNumber = B.roomNumber AND R.hotelID = B.hotelID AND B.customerID = $1 \
         ORDER BY B.bookingDate DESC \
         LIMIT $2",
    )
    .bind(customer)
    .bind(RECENT_LIMIT)
}

/// Bookings at every hotel `manager` runs, optionally limited to an inclusive
/// date range, oldest first.
pub fn hotel_booking_history_query(manager: UserId, range: Option<(NaiveDate, NaiveDate)>) -> Statement {
    let base = "SELECT B.bookingID, U.name, B.hotelID, B.roomNumber, B.bookingDate \
                FROM RoomBookings B, Hotel H, Users U \
                WHERE U.userID = B.customerID AND H.managerUserID = $1 AND H.hotelID = B.hotelID";
    match range {
        None => Statement::new(format!("{base} ORDER BY B.bookingDate")).bind(manager),
        Some((start, end)) => Statement::new(format!("{base} AND B.bookingDate BETWEEN $2 AND $3 ORDER BY B.bookingDate"))
            .bind(manager)
            .bind(start)
            .bind(end),
    }
}

pub fn regular_customers_query(hotel_id: HotelId) -> Statement {
    Statement::new(
        "SELECT customerID, COUNT(*) AS Bookings \
         FROM RoomBookings \
         WHERE hotelID = $1 \
         GROUP BY customerID \
         ORDER BY Bookings DESC \
         LIMIT $2",
    )
    .bind(hotel_id)
    .bind(RECENT_LIMIT)
}

/// Book a room for the caller if nobody holds it on that date.
#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn book_room(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    let hotel_id: HotelId = console.prompt_parsed("Enter HotelID", "hotel ID")?;
    let room_number: RoomNumber = console.prompt_parsed("Enter Room Number", "room number")?;
    let date = console.prompt_date("Enter Date in Format (MM/DD/YYYY)", "booking date")?;

    if gw.count(&booking_exists_query(hotel_id, room_number, date)).await? > 0 {
        return Ok(Outcome::Rejected(Rejection::NoAvailability));
    }

    console.line("This room is available on this date! Booking now...")?;
    let insert = Statement::new(
        "INSERT INTO RoomBookings (customerID, hotelID, roomNumber, bookingDate) VALUES ($1, $2, $3, $4)",
    )
    .bind(session.user_id())
    .bind(hotel_id)
    .bind(room_number)
    .bind(date);
    gw.execute(&insert).await?;
    info!(hotel_id, room_number, %date, "Room booked");

    console.line(&format!(
        "\tSuccessfully booked Room Number: {room_number}\n \tAt hotel with hotel ID: {hotel_id}"
    ))?;

    let price_query = Statement::new("SELECT R.price FROM Rooms R WHERE R.hotelID = $1 AND R.roomNumber = $2")
        .bind(hotel_id)
        .bind(room_number);
    let price = gw.fetch_rows(&price_query).await?;
    console.line(&format!("\tWith Price: ${}", price.first_value().unwrap_or_default()))?;

    Ok(Outcome::Done)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn view_recent_bookings(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    gw.execute_and_print(&recent_bookings_query(session.user_id()), console.out())
        .await?;
    Ok(Outcome::Done)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn view_hotel_booking_history(
    gw: &mut dyn Gateway,
    console: &mut Console,
    session: &Session,
) -> Result<Outcome> {
    if let Some(rejection) = require_manager(gw, session).await? {
        return Ok(Outcome::Rejected(rejection));
    }

    let range = match console.prompt("Do you wish to select a date range? (y/n)")?.trim() {
        "n" => None,
        "y" => {
            let start = console.prompt_date("Please enter the start date (MM/DD/YYYY)", "start date")?;
            let end = console.prompt_date("Please enter the end date (MM/DD/YYYY)", "end date")?;
            Some((start, end))
        }
        _ => return Ok(Outcome::Rejected(Rejection::UnknownOption)),
    };

    gw.execute_and_print(&hotel_booking_history_query(session.user_id(), range), console.out())
        .await?;
    Ok(Outcome::Done)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn view_regular_customers(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    if let Some(rejection) = require_manager(gw, session).await? {
        return Ok(Outcome::Rejected(rejection));
    }

    let hotel_id: HotelId = console.prompt_parsed("Enter HotelID", "hotel ID")?;
    if !owns_hotel(gw, session.user_id(), hotel_id).await? {
        return Ok(Outcome::Rejected(Rejection::HotelNotManaged));
    }

    gw.execute_and_print(&regular_customers_query(hotel_id), console.out())
        .await?;
    Ok(Outcome::Done)
}
