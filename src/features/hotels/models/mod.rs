mod hotel_booking;

pub use hotel_booking::*;
