mod vehicle_booking;

pub use vehicle_booking::*;
