mod immigration_dto;

pub use immigration_dto::*;
