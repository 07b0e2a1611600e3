//! Solidity interface of the HotelBooking contract

use alloy::sol;
use hotel_types::Booking;

sol! {
    #[sol(rpc)]
    contract HotelBooking {
        struct Booking {
            address customer;
            uint256 roomType;
            uint256 bookingDays;
        }

        function owner() external view returns (address);

        function registerHotel(string memory name, uint256 price) external;

        function bookHotel(string memory name, uint256 roomType, uint256 bookingDays) external payable;

        function estimateBookingPrice(string memory name, uint256 roomType, uint256 bookingDays)
            external view returns (uint256);

        function getHotelBookings(string memory name) external view returns (Booking[] memory);

        function setIPFSHash(string memory name, uint8 hashFunction, uint8 hashSize, bytes32 digest)
            external;

        function getIPFShash(string memory name) external view returns (string memory);
    }
}

pub use HotelBooking::Booking as BookingSol;

impl From<BookingSol> for Booking {
    fn from(b: BookingSol) -> Self {
        Booking {
            customer: b.customer,
            room_type: b.roomType,
            booking_days: b.bookingDays,
        }
    }
}
