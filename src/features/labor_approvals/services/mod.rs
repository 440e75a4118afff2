pub mod fee_calculator;
mod labor_approval_service;

pub use labor_approval_service::LaborApprovalService;
