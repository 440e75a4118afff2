mod labor_approval_handler;

pub use labor_approval_handler::*;
