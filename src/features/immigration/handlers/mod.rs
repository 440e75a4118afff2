mod immigration_handler;

pub use immigration_handler::*;
