//! The catalog of menu operations.
//!
//! Every handler takes the gateway, the console and (when logged in) the
//! caller's [`Session`], reads its own input, runs its checks and statements,
//! and reports an [`Outcome`]. Expected refusals such as a customer picking a
//! manager item come back as [`Outcome::Rejected`]; input-format and database
//! failures come back as `Err` and are reported by the menu loop.

pub mod bookings;
pub mod hotels;
pub mod repairs;
pub mod rooms;

use std::fmt;

use tracing::instrument;

use crate::auth;
use crate::console::Console;
use crate::db::gateway::{Gateway, Statement};
use crate::errors::Result;
use crate::session::Session;
use crate::types::{HotelId, UserId};

/// Result of a handler that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Rejected(Rejection),
}

/// Expected refusals, each printed as a single message before returning to the menu.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("This option is for MANAGERS only.")]
    ManagersOnly,

    #[error("You can only update rooms of hotels that you manage.")]
    NotHotelManager,

    #[error("No such room in this hotel.")]
    NoSuchRoom,

    #[error("Found no hotel with this hotelID under your management.")]
    HotelNotManaged,

    #[error("There is no availability for this room on this date. Sorry!")]
    NoAvailability,

    #[error("Not an option! Goodbye!")]
    UnknownOption,
}

/// Menu entries available once logged in, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ViewHotels,
    ViewRooms,
    BookRoom,
    ViewRecentBookings,
    UpdateRoomInfo,
    ViewRecentUpdates,
    ViewBookingHistory,
    ViewRegularCustomers,
    PlaceRepairRequest,
    ViewRepairHistory,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::ViewHotels,
        Operation::ViewRooms,
        Operation::BookRoom,
        Operation::ViewRecentBookings,
        Operation::UpdateRoomInfo,
        Operation::ViewRecentUpdates,
        Operation::ViewBookingHistory,
        Operation::ViewRegularCustomers,
        Operation::PlaceRepairRequest,
        Operation::ViewRepairHistory,
    ];

    pub fn from_choice(choice: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.choice() == choice)
    }

    pub fn choice(&self) -> i64 {
        match self {
            Operation::ViewHotels => 1,
            Operation::ViewRooms => 2,
            Operation::BookRoom => 3,
            Operation::ViewRecentBookings => 4,
            Operation::UpdateRoomInfo => 5,
            Operation::ViewRecentUpdates => 6,
            Operation::ViewBookingHistory => 7,
            Operation::ViewRegularCustomers => 8,
            Operation::PlaceRepairRequest => 9,
            Operation::ViewRepairHistory => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::ViewHotels => "View Hotels within 30 units",
            Operation::ViewRooms => "View Rooms",
            Operation::BookRoom => "Book a Room",
            Operation::ViewRecentBookings => "View recent booking history",
            Operation::UpdateRoomInfo => "Update Room Information",
            Operation::ViewRecentUpdates => "View 5 recent Room Updates Info",
            Operation::ViewBookingHistory => "View booking history of the hotel",
            Operation::ViewRegularCustomers => "View 5 regular Customers",
            Operation::PlaceRepairRequest => "Place room repair Request to a company",
            Operation::ViewRepairHistory => "View room repair Requests history",
        }
    }

    /// Whether the item is listed only for managers.
    pub fn manager_only(&self) -> bool {
        self.choice() >= 5
    }

    #[instrument(skip(self, gw, console), fields(operation = ?self, user_id = session.user_id()))]
    pub async fn run(&self, gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
        match self {
            Operation::ViewHotels => hotels::view_hotels(gw, console).await,
            Operation::ViewRooms => hotels::view_rooms(gw, console).await,
            Operation::BookRoom => bookings::book_room(gw, console, session).await,
            Operation::ViewRecentBookings => bookings::view_recent_bookings(gw, console, session).await,
            Operation::UpdateRoomInfo => rooms::update_room_info(gw, console, session).await,
            Operation::ViewRecentUpdates => rooms::view_recent_updates(gw, console, session).await,
            Operation::ViewBookingHistory => bookings::view_hotel_booking_history(gw, console, session).await,
            Operation::ViewRegularCustomers => bookings::view_regular_customers(gw, console, session).await,
            Operation::PlaceRepairRequest => repairs::place_repair_request(gw, console, session).await,
            Operation::ViewRepairHistory => repairs::view_repair_history(gw, console, session).await,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.choice(), self.label())
    }
}

/// Re-check the manager flag against the database.
///
/// The session's cached flag only decides what the menu shows; handlers ask
/// again so a demoted user is refused.
pub(crate) async fn require_manager(gw: &mut dyn Gateway, session: &Session) -> Result<Option<Rejection>> {
    Ok((!auth::is_manager(gw, session.user_id()).await?).then_some(Rejection::ManagersOnly))
}

/// Whether `hotel_id` exists and is managed by `manager`.
#[instrument(skip(gw), err)]
pub(crate) async fn owns_hotel(gw: &mut dyn Gateway, manager: UserId, hotel_id: HotelId) -> Result<bool> {
    let query = Statement::new("SELECT * FROM Hotel WHERE hotelID = $1 AND managerUserID = $2")
        .bind(hotel_id)
        .bind(manager);
    Ok(gw.count(&query).await? > 0)
}
