mod hotel_handler;

pub use hotel_handler::*;
