use std::{fmt, ops::Deref, str::FromStr};

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Input rejected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("hotel name must not be empty")]
    EmptyHotelName,

    #[error("invalid room type {0:?}: expected a non-negative integer")]
    InvalidRoomType(String),

    #[error("invalid number of booking days {0:?}: expected a positive integer")]
    InvalidBookingDays(String),

    #[error("invalid base price {0:?}: expected a positive integer amount")]
    InvalidPrice(String),

    #[error("digest of {0} bytes can not be stored, expected 32")]
    DigestLength(usize),
}

/// A hotel name that is not empty or blank.
///
/// The name is kept exactly as entered; surrounding whitespace is part of
/// the key the contract uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HotelName(String);

impl HotelName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HotelName {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyHotelName);
        }
        Ok(Self(s))
    }
}

impl TryFrom<&str> for HotelName {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from(s.to_string())
    }
}

impl FromStr for HotelName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl From<HotelName> for String {
    fn from(n: HotelName) -> Self {
        n.0
    }
}

impl Deref for HotelName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for HotelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated request to book a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    hotel_name: HotelName,
    room_type: u64,
    booking_days: u64,
}

impl BookingRequest {
    pub fn new(
        hotel_name: HotelName,
        room_type: u64,
        booking_days: u64,
    ) -> Result<Self, ValidationError> {
        if booking_days == 0 {
            return Err(ValidationError::InvalidBookingDays(booking_days.to_string()));
        }
        Ok(Self {
            hotel_name,
            room_type,
            booking_days,
        })
    }

    /// Validate raw user input.
    ///
    /// Numbers must be plain decimal integers (surrounding whitespace is
    /// ignored); trailing garbage such as `"3 nights"` is rejected.
    pub fn parse(
        hotel_name: &str,
        room_type: &str,
        booking_days: &str,
    ) -> Result<Self, ValidationError> {
        let hotel_name = HotelName::try_from(hotel_name)?;
        let room_type = decimal(room_type)
            .and_then(|d| d.parse::<u64>().ok())
            .ok_or_else(|| ValidationError::InvalidRoomType(room_type.to_string()))?;
        let days = decimal(booking_days)
            .and_then(|d| d.parse::<u64>().ok())
            .ok_or_else(|| ValidationError::InvalidBookingDays(booking_days.to_string()))?;
        Self::new(hotel_name, room_type, days)
    }

    pub fn hotel_name(&self) -> &HotelName {
        &self.hotel_name
    }

    pub fn room_type(&self) -> u64 {
        self.room_type
    }

    pub fn booking_days(&self) -> u64 {
        self.booking_days
    }
}

/// A validated hotel registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    name: HotelName,
    price: U256,
}

impl Registration {
    pub fn new(name: HotelName, price: U256) -> Result<Self, ValidationError> {
        if price.is_zero() {
            return Err(ValidationError::InvalidPrice(price.to_string()));
        }
        Ok(Self { name, price })
    }

    /// Validate raw user input. The base price is a decimal integer in the
    /// smallest unit of the native currency.
    pub fn parse(name: &str, price: &str) -> Result<Self, ValidationError> {
        let name = HotelName::try_from(name)?;
        let p = decimal(price)
            .and_then(|d| U256::from_str_radix(d, 10).ok())
            .ok_or_else(|| ValidationError::InvalidPrice(price.to_string()))?;
        Self::new(name, p).map_err(|_| ValidationError::InvalidPrice(price.to_string()))
    }

    pub fn name(&self) -> &HotelName {
        &self.name
    }

    pub fn price(&self) -> U256 {
        self.price
    }
}

/// `s` without surrounding whitespace if it consists of ASCII digits only.
///
/// Signs, digit separators and trailing text are rejected.
fn decimal(s: &str) -> Option<&str> {
    let d = s.trim();
    (!d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())).then_some(d)
}

/// A booking as recorded by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub customer: Address,
    pub room_type: U256,
    pub booking_days: U256,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "customer: {} - room type: {} - booking days: {}",
            self.customer, self.room_type, self.booking_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_booking() {
        let r = BookingRequest::parse("Grand Hotel", "1", " 3 ").unwrap();
        assert_eq!(r.hotel_name().as_str(), "Grand Hotel");
        assert_eq!(r.room_type(), 1);
        assert_eq!(r.booking_days(), 3);

        let r = BookingRequest::parse("Grand Hotel", "0", "1").unwrap();
        assert_eq!(r.room_type(), 0);
    }

    #[test]
    fn reject_booking_input() {
        assert_eq!(
            BookingRequest::parse("", "1", "3"),
            Err(ValidationError::EmptyHotelName)
        );
        assert_eq!(
            BookingRequest::parse("  \t", "1", "3"),
            Err(ValidationError::EmptyHotelName)
        );
        assert_eq!(
            BookingRequest::parse("Grand Hotel", "1", "0"),
            Err(ValidationError::InvalidBookingDays("0".into()))
        );
        assert_eq!(
            BookingRequest::parse("Grand Hotel", "1", "-2"),
            Err(ValidationError::InvalidBookingDays("-2".into()))
        );
        assert_eq!(
            BookingRequest::parse("Grand Hotel", "suite", "3"),
            Err(ValidationError::InvalidRoomType("suite".into()))
        );
        assert_eq!(
            BookingRequest::parse("Grand Hotel", "-1", "3"),
            Err(ValidationError::InvalidRoomType("-1".into()))
        );
        for days in ["3 nights", "+3", "1_0", "0x3"] {
            assert_eq!(
                BookingRequest::parse("Grand Hotel", "1", days),
                Err(ValidationError::InvalidBookingDays(days.into()))
            );
        }
        assert_eq!(
            BookingRequest::parse("Grand Hotel", "+1", "3"),
            Err(ValidationError::InvalidRoomType("+1".into()))
        );
        assert!(BookingRequest::new("Grand Hotel".parse().unwrap(), 1, 0).is_err());
    }

    #[test]
    fn parse_registration() {
        let r = Registration::parse("Grand Hotel", "100").unwrap();
        assert_eq!(r.price(), U256::from(100));

        let big = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(Registration::parse("Grand Hotel", big).unwrap().price(), U256::MAX);

        assert_eq!(
            Registration::parse("", "100"),
            Err(ValidationError::EmptyHotelName)
        );
        for p in ["0", "-5", "1.5", "abc", "", "1_000", "+100", "0x64", "100 wei"] {
            assert_eq!(
                Registration::parse("Grand Hotel", p),
                Err(ValidationError::InvalidPrice(p.into()))
            );
        }
    }

    #[test]
    fn hotel_name_keeps_whitespace() {
        let n: HotelName = " Grand ".parse().unwrap();
        assert_eq!(n.as_str(), " Grand ");
    }
}
