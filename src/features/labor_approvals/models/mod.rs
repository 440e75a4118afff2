mod labor_approval;

pub use labor_approval::*;
