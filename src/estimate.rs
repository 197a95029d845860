use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::pay::Compensation;
use crate::scenario::Scenario;
use crate::tax::brackets::{BracketError, BracketSchedule};
use crate::tax::country::{us_federal_brackets, Country, LocalTax};
use crate::tax::overlay::{apply_overlay, OverlayResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("FX rate must be greater than zero, got {0}")]
    FxNotPositive(Decimal),

    #[error("US overlay does not apply when the work country is the United States")]
    OverlayInUnitedStates,

    #[error("compensation component `{0}` is negative")]
    NegativePay(&'static str),

    #[error(transparent)]
    Bracket(#[from] BracketError),
}

/// USD equivalents of the local layer, converted at the scenario FX rate.
/// Earned and RSU are the gross amounts, never the locally-exempted ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsdView {
    pub earned: Decimal,
    pub rsu: Decimal,
    pub local_tax: Decimal,
    pub local_net: Decimal,
}

/// A fully computed estimate: local layer plus optional US overlay
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub country: Country,
    pub currency: &'static str,
    pub fx_rate: Decimal,
    pub pay: Compensation,
    pub earned: Decimal,
    pub total_comp: Decimal,
    pub local: LocalTax,
    pub usd: UsdView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayResult>,
}

/// Compute the full estimate for a scenario
pub fn calculate(scenario: &Scenario) -> Result<Estimate, EstimateError> {
    if let Some(field) = scenario.pay.negative_component() {
        return Err(EstimateError::NegativePay(field));
    }

    let fx = scenario
        .fx_rate
        .unwrap_or_else(|| scenario.country.default_fx());
    if fx <= Decimal::ZERO {
        return Err(EstimateError::FxNotPositive(fx));
    }

    let schedule = match &scenario.brackets {
        Some(rows) => BracketSchedule::new(rows.clone())?,
        None => scenario.country.default_brackets(),
    };

    let local = scenario.country.local_tax(&scenario.pay, &schedule);
    let usd = UsdView {
        earned: scenario.pay.earned() / fx,
        rsu: scenario.pay.y1_rsu / fx,
        local_tax: local.tax / fx,
        local_net: local.net / fx,
    };

    let overlay = match &scenario.us_overlay {
        Some(_) if scenario.country == Country::UnitedStates => {
            return Err(EstimateError::OverlayInUnitedStates);
        }
        Some(overlay) => {
            let us_schedule = match &overlay.brackets {
                Some(rows) => BracketSchedule::new(rows.clone())?,
                None => us_federal_brackets(),
            };
            Some(apply_overlay(
                usd.earned,
                usd.rsu,
                usd.local_tax,
                &overlay.params,
                &us_schedule,
            ))
        }
        None => None,
    };

    Ok(Estimate {
        country: scenario.country,
        currency: scenario.country.currency_code(),
        fx_rate: fx,
        pay: scenario.pay.clone(),
        earned: scenario.pay.earned(),
        total_comp: scenario.pay.total(),
        local,
        usd,
        overlay,
    })
}
