mod hotel_service;

pub use hotel_service::HotelService;
