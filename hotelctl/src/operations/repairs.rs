//! Room repair requests filed by managers with maintenance companies.

use tracing::{info, instrument, warn};

use crate::console::Console;
use crate::db::errors::DbError;
use crate::db::gateway::{Gateway, Statement};
use crate::errors::Result;
use crate::operations::{Outcome, Rejection, owns_hotel, require_manager};
use crate::session::Session;
use crate::types::{CompanyId, HotelId, RepairId, RoomNumber, UserId};

/// Sequence backing `RoomRepairs.repairID`
pub const REPAIRS_SEQUENCE: &str = "RoomRepairs_repairID_seq";

/// Insert the repair row and the request row that points at it.
///
/// Must run inside a transaction: the request references the repair through
/// the sequence value read back on the same connection.
async fn file_repair(
    gw: &mut dyn Gateway,
    manager: UserId,
    hotel_id: HotelId,
    room_number: RoomNumber,
    company_id: CompanyId,
) -> Result<RepairId> {
    let repair = Statement::new(
        "INSERT INTO RoomRepairs (companyID, hotelID, roomNumber, repairDate) VALUES ($1, $2, $3, CURRENT_DATE)",
    )
    .bind(company_id)
    .bind(hotel_id)
    .bind(room_number);
    gw.execute(&repair).await?;

    let repair_id = gw.current_sequence_value(REPAIRS_SEQUENCE).await?;
    if repair_id < 0 {
        return Err(DbError::NotFound.into());
    }

    let request = Statement::new("INSERT INTO RoomRepairRequests (managerID, repairID) VALUES ($1, $2)")
        .bind(manager)
        .bind(repair_id);
    gw.execute(&request).await?;
    Ok(repair_id)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn place_repair_request(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    if let Some(rejection) = require_manager(gw, session).await? {
        return Ok(Outcome::Rejected(rejection));
    }

    console.line("\tPlease enter the following information for your Room Repair Request: ")?;
    let hotel_id: HotelId = console.prompt_parsed("HotelID", "hotel ID")?;
    let room_number: RoomNumber = console.prompt_parsed("Room Number", "room number")?;
    let company_id: CompanyId = console.prompt_parsed("Company ID of maintenance company", "company ID")?;

    if !owns_hotel(gw, session.user_id(), hotel_id).await? {
        return Ok(Outcome::Rejected(Rejection::NotHotelManager));
    }

    gw.begin().await?;
    let repair_id = match file_repair(gw, session.user_id(), hotel_id, room_number, company_id).await {
        Ok(repair_id) => repair_id,
        Err(e) => {
            if let Err(rollback_err) = gw.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back repair request");
            }
            return Err(e);
        }
    };
    gw.commit().await?;
    info!(repair_id, hotel_id, room_number, company_id, "Repair request placed");

    console.line("\tSuccessfully placed Room Repair Request!")?;
    Ok(Outcome::Done)
}

#[instrument(skip(gw, console), fields(user_id = session.user_id()))]
pub async fn view_repair_history(gw: &mut dyn Gateway, console: &mut Console, session: &Session) -> Result<Outcome> {
    if let Some(rejection) = require_manager(gw, session).await? {
        return Ok(Outcome::Rejected(rejection));
    }

    let query = Statement::new(
        "SELECT R.companyID, R.hotelID, R.roomNumber, R.repairDate \
         FROM RoomRepairs R, Hotel H \
         WHERE R.hotelID = H.hotelID AND H.managerUserID = $1",
    )
    .bind(session.user_id());
    gw.execute_and_print(&query, console.out()).await?;
    Ok(Outcome::Done)
}
