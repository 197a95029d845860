use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tax::brackets::{BracketSchedule, Slab};

/// Simplified US-person overlay parameters, in USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayParams {
    /// Foreign Earned Income Exclusion
    #[serde(default = "default_feie")]
    pub feie: Decimal,
    /// US standard deduction
    #[serde(default = "default_standard_deduction")]
    pub standard_deduction: Decimal,
}

fn default_feie() -> Decimal {
    dec!(126500)
}

fn default_standard_deduction() -> Decimal {
    dec!(14600)
}

impl Default for OverlayParams {
    fn default() -> Self {
        OverlayParams {
            feie: default_feie(),
            standard_deduction: default_standard_deduction(),
        }
    }
}

/// Result of the US overlay, all figures in USD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayResult {
    /// Gross income less FEIE and standard deduction, floored at zero
    pub us_taxable: Decimal,
    /// Tax from the US schedule on `us_taxable`
    pub tentative_tax: Decimal,
    /// Foreign tax credit used, capped at the tentative tax
    pub ftc_used: Decimal,
    /// Tentative tax less the credit
    pub us_due: Decimal,
    /// Local tax plus US tax due
    pub combined_tax: Decimal,
    /// Gross USD income less combined tax
    pub combined_net: Decimal,
    pub slabs: Vec<Slab>,
}

/// Apply the simplified overlay: FEIE and the standard deduction reduce gross
/// USD income (earned and RSU both), the US schedule produces a tentative
/// tax, and local tax offsets it up to that tentative amount.
pub fn apply_overlay(
    earned_usd: Decimal,
    rsu_usd: Decimal,
    local_tax_usd: Decimal,
    params: &OverlayParams,
    us_schedule: &BracketSchedule,
) -> OverlayResult {
    let gross = earned_usd + rsu_usd;
    let us_taxable = (gross - params.feie - params.standard_deduction).max(Decimal::ZERO);
    let p = us_schedule.apply(us_taxable);
    let ftc_used = local_tax_usd.min(p.tax);
    let us_due = (p.tax - ftc_used).max(Decimal::ZERO);
    let combined_tax = local_tax_usd + us_due;

    OverlayResult {
        us_taxable,
        tentative_tax: p.tax,
        ftc_used,
        us_due,
        combined_tax,
        combined_net: gross - combined_tax,
        slabs: p.slabs,
    }
}
