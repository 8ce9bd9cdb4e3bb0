//! Common type definitions shared by the gateway, auth and operation layers.
//!
//! # ID Types
//!
//! Every entity in the reservation schema is keyed by a PostgreSQL `INTEGER`
//! (or a `BIGINT` sequence value for repairs). The aliases below keep handler
//! signatures readable:
//!
//! - [`UserId`]: `Users.userID`
//! - [`HotelId`]: `Hotel.hotelID`
//! - [`RoomNumber`]: `Rooms.roomNumber` (unique only together with a hotel)
//! - [`CompanyId`]: `MaintenanceCompany.companyID`
//! - [`RepairId`]: value of `RoomRepairs_repairID_seq`

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

pub type UserId = i32;
pub type HotelId = i32;
pub type RoomNumber = i32;
pub type CompanyId = i32;
pub type RepairId = i64;

/// Date formats accepted wherever a booking or filter date is read.
///
/// The first entry is the one shown in prompts.
pub const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Parse a user-entered date in any of [`DATE_FORMATS`].
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input.trim(), format).ok())
}

/// Kind of account stored in `Users.userType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserType {
    Customer,
    Manager,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Customer => "customer",
            UserType::Manager => "manager",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room attribute a manager can change through the update-room operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    Price,
    ImageUrl,
}

impl RoomField {
    pub fn column(&self) -> &'static str {
        match self {
            RoomField::Price => "price",
            RoomField::ImageUrl => "imageURL",
        }
    }
}

impl FromStr for RoomField {
    type Err = ();

    /// Parses the numbered sub-menu answer (`1` price, `2` image URL).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(RoomField::Price),
            "2" => Ok(RoomField::ImageUrl),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(parse_date("07/01/2024"), Some(expected));
        assert_eq!(parse_date(" 2024-07-01 "), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("13/45/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_room_field_from_choice() {
        assert_eq!("1".parse::<RoomField>(), Ok(RoomField::Price));
        assert_eq!(" 2\n".parse::<RoomField>(), Ok(RoomField::ImageUrl));
        assert!("3".parse::<RoomField>().is_err());
        assert!("price".parse::<RoomField>().is_err());
    }

    #[test]
    fn test_user_type_strings_match_schema() {
        assert_eq!(UserType::Customer.to_string(), "customer");
        assert_eq!(UserType::Manager.as_str(), "manager");
    }
}
