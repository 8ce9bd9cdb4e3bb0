//! Read-only hotel and room lookups.

use chrono::NaiveDate;
use tracing::instrument;

use crate::console::Console;
use crate::db::gateway::{Gateway, Statement};
use crate::errors::Result;
use crate::operations::Outcome;
use crate::types::HotelId;

/// Hotels closer than this (in `calculate_distance` units) are "nearby".
pub const DISTANCE_THRESHOLD: i32 = 30;

pub fn nearby_hotels_query(latitude: f64, longitude: f64) -> Statement {
    Statement::new(
        "SELECT H.hotelID, H.hotelName, H.latitude, H.longitude, H.dateEstablished \
         FROM Hotel H \
         WHERE calculate_distance(H.latitude, H.longitude, $1::numeric, $2::numeric) < $3",
    )
    .bind(latitude)
    .bind(longitude)
    .bind(DISTANCE_THRESHOLD)
}

/// Rooms of `hotel_id` free on `date`: rooms booked only on other dates, plus
/// rooms never booked at all. A room booked on `date` never appears here, even
/// if it also has bookings on other dates.
pub fn available_rooms_query(hotel_id: HotelId, date: NaiveDate) -> Statement {
    Statement::new(
        "SELECT DISTINCT B.roomNumber, R.price \
         FROM RoomBookings B, Rooms R \
         WHERE B.hotelID = $1 AND R.hotelID = $1 AND B.roomNumber = R.roomNumber AND B.bookingDate != $2 \
           AND NOT EXISTS (SELECT 1 FROM RoomBookings X \
                           WHERE X.hotelID = $1 AND X.roomNumber = B.roomNumber AND X.bookingDate = $2) \
         UNION \
         SELECT R.roomNumber, R.price \
         FROM Rooms R \
         WHERE R.hotelID = $1 \
           AND R.roomNumber NOT IN (SELECT DISTINCT B.roomNumber FROM RoomBookings B WHERE B.hotelID = $1) \
         ORDER BY roomNumber",
    )
    .bind(hotel_id)
    .bind(date)
}

pub fn unavailable_rooms_query(hotel_id: HotelId, date: NaiveDate) -> Statement {
    Statement::new(
        "SELECT DISTINCT B.roomNumber, R.price \
         FROM RoomBookings B, Rooms R \
         WHERE B.hotelID = $1 AND R.hotelID = $1 AND B.roomNumber = R.roomNumber AND B.bookingDate = $2",
    )
    .bind(hotel_id)
    .bind(date)
}

#[instrument(skip_all)]
pub async fn view_hotels(gw: &mut dyn Gateway, console: &mut Console) -> Result<Outcome> {
    let latitude: f64 = console.prompt_parsed("Enter Latitude", "latitude")?;
    let longitude: f64 = console.prompt_parsed("Enter Longitude", "longitude")?;

    gw.execute_and_print(&nearby_hotels_query(latitude, longitude), console.out())
        .await?;
    Ok(Outcome::Done)
}

#[instrument(skip_all)]
pub async fn view_rooms(gw: &mut dyn Gateway, console: &mut Console) -> Result<Outcome> {
    let hotel_id: HotelId = console.prompt_parsed("Enter Hotel ID", "hotel ID")?;
    let date = console.prompt_date("Enter Date", "date")?;

    console.line("\tHere is a list of the available rooms:")?;
    gw.execute_and_print(&available_rooms_query(hotel_id, date), console.out())
        .await?;

    console.line("\tHere is a list of the unavailable rooms:")?;
    gw.execute_and_print(&unavailable_rooms_query(hotel_id, date), console.out())
        .await?;
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::gateway::Value;
    use crate::errors::Error;
    use crate::test_utils::{MockGateway, rows, scripted_console};

    #[test_log::test(tokio::test)]
    async fn test_view_hotels_binds_coordinates() {
        let mut gw = MockGateway::new();
        gw.on_rows(
            "calculate_distance",
            rows(
                &["hotelid", "hotelname", "latitude", "longitude", "dateestablished"],
                &[&["1", "Hotel A", "33.9", "-117.4", "2001-05-04"]],
            ),
        );
        let (mut console, out, _err) = scripted_console(&["33.9", "-117.4"]);

        let outcome = view_hotels(&mut gw, &mut console).await.unwrap();

        assert_eq!(outcome, Outcome::Done);
        let query = gw.statements_matching("calculate_distance")[0];
        assert_eq!(
            query.params(),
            &[Value::Float(33.9), Value::Float(-117.4), Value::Int(DISTANCE_THRESHOLD)]
        );
        assert!(out.contents().contains("|Hotel A"));
    }

    #[test_log::test(tokio::test)]
    async fn test_view_hotels_rejects_non_numeric_latitude() {
        let mut gw = MockGateway::new();
        let (mut console, _out, _err) = scripted_console(&["north", "-117.4"]);

        let err = view_hotels(&mut gw, &mut console).await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput { field: "latitude", .. }));
        assert!(gw.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_view_rooms_prints_both_lists() {
        let mut gw = MockGateway::new();
        gw.on_rows(
            "UNION",
            rows(&["roomnumber", "price"], &[&["101", "120.00"], &["102", "95.00"]]),
        )
        .on_rows("B.bookingDate = $2", rows(&["roomnumber", "price"], &[&["103", "80.00"]]));
        let (mut console, out, _err) = scripted_console(&["1", "07/01/2024"]);

        view_rooms(&mut gw, &mut console).await.unwrap();

        let text = out.contents();
        let available = text.find("available rooms:").unwrap();
        let unavailable = text.find("unavailable rooms:").unwrap();
        let room_101 = text.find("|101").unwrap();
        let room_103 = text.find("|103").unwrap();
        assert!(available < room_101 && room_101 < unavailable && unavailable < room_103);

        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        for query in gw.statements_matching("FROM RoomBookings B, Rooms R") {
            assert_eq!(query.params(), &[Value::Int(1), Value::Date(date)]);
        }
    }

    #[test]
    fn test_available_rooms_exclude_rooms_booked_that_day() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let query = available_rooms_query(1, date);

        assert!(query.sql().contains(
            "NOT EXISTS (SELECT 1 FROM RoomBookings X \
             WHERE X.hotelID = $1 AND X.roomNumber = B.roomNumber AND X.bookingDate = $2)"
        ));
        assert_eq!(query.params(), &[Value::Int(1), Value::Date(date)]);
    }
}
