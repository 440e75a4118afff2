//! Labor approval fee schedule (NPR).
//!
//! The application fee depends on the destination country and the service charge
//! on the job category plus a salary surcharge. Lookups are case-insensitive and
//! fall back to an explicit default when the key is unknown.

use std::collections::HashMap;

use lazy_static::lazy_static;
use rust_decimal::Decimal;

use crate::features::labor_approvals::dtos::FeeBreakdownDto;
use crate::shared::money::round_to_cents;

/// Immutable lookup table with an explicit fallback
pub struct FeeTable {
    entries: HashMap<&'static str, Decimal>,
    default: Decimal,
}

impl FeeTable {
    fn new(entries: &[(&'static str, i64)], default: i64) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(key, fee)| (*key, Decimal::from(*fee)))
                .collect(),
            default: Decimal::from(default),
        }
    }

    pub fn lookup(&self, key: &str) -> Decimal {
        let key = key.trim().to_lowercase();
        self.entries
            .get(key.as_str())
            .copied()
            .unwrap_or(self.default)
    }
}

lazy_static! {
    pub static ref APPLICATION_FEES: FeeTable = FeeTable::new(
        &[
            ("malaysia", 7500),
            ("qatar", 10000),
            ("uae", 12000),
            ("united arab emirates", 12000),
            ("saudi arabia", 8500),
            ("kuwait", 9000),
            ("bahrain", 8000),
            ("oman", 8500),
            ("iran", 6000),
            ("iraq", 7000),
            ("libya", 7500),
            ("afghanistan", 5000),
        ],
        5000,
    );

    pub static ref SERVICE_CHARGES: FeeTable = FeeTable::new(
        &[
            ("manager", 5000),
            ("engineer", 5000),
            ("doctor", 5000),
            ("technician", 3000),
            ("skilled worker", 3000),
            ("semi-skilled", 2000),
            ("unskilled", 1000),
            ("labor", 1000),
        ],
        2000,
    );
}

/// Extra service charge for well-paid contracts
pub fn salary_surcharge(offered_salary: Decimal) -> Decimal {
    if offered_salary > Decimal::from(50_000) {
        Decimal::from(2000)
    } else if offered_salary > Decimal::from(30_000) {
        Decimal::from(1000)
    } else {
        Decimal::ZERO
    }
}

/// Compute the fee for an application. Pure and deterministic.
///
/// The salary is rounded to cents first so the surcharge agrees with the stored salary.
pub fn calculate_fee(
    destination_country: &str,
    job_category: &str,
    offered_salary: Decimal,
) -> FeeBreakdownDto {
    let offered_salary = round_to_cents(offered_salary);
    let application_fee = APPLICATION_FEES.lookup(destination_country);
    let service_charge = SERVICE_CHARGES.lookup(job_category) + salary_surcharge(offered_salary);

    FeeBreakdownDto {
        application_fee,
        service_charge,
        total_fee: application_fee + service_charge,
        country: destination_country.to_string(),
        job_category: job_category.to_string(),
    }
}
