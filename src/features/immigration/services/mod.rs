mod immigration_service;

pub use immigration_service::ImmigrationService;
