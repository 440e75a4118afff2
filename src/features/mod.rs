pub mod auth;
pub mod hotels;
pub mod immigration;
pub mod labor_approvals;
pub mod tickets;
pub mod users;
pub mod vehicles;
