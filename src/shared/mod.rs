pub mod constants;
pub mod money;
pub mod search;
pub mod status;
pub mod test_helpers;
pub mod types;
pub mod validation;
