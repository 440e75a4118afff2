mod immigration_application;

pub use immigration_application::*;
