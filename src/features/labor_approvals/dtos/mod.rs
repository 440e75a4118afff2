mod labor_approval_dto;

pub use labor_approval_dto::*;
