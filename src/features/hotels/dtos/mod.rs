mod hotel_dto;

pub use hotel_dto::*;
