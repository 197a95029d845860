use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single marginal slab. `upper_limit: None` marks the unbounded top slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bracket {
    /// Upper bound of the slab in schedule currency (None = no upper bound)
    pub upper_limit: Option<Decimal>,
    /// Marginal rate, as a decimal (0.22) or a percentage (22)
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(upper_limit: Option<Decimal>, rate: Decimal) -> Self {
        Bracket { upper_limit, rate }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("bracket rate {0} is negative")]
    NegativeRate(Decimal),
    #[error("bracket rate {0} exceeds 100%")]
    RateTooHigh(Decimal),
    #[error("bracket upper limit {0} is negative")]
    NegativeLimit(Decimal),
}

/// An ordered progressive schedule, sanitized on construction:
/// percentage-style rates are normalized to decimals, slabs are sorted by
/// upper limit (unbounded last), and a terminal unbounded slab reusing the
/// last rate is appended if none exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSchedule(Vec<Bracket>);

impl BracketSchedule {
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, BracketError> {
        let mut out = Vec::with_capacity(brackets.len() + 1);
        for b in brackets {
            if b.rate < Decimal::ZERO {
                return Err(BracketError::NegativeRate(b.rate));
            }
            if b.rate > dec!(100) {
                return Err(BracketError::RateTooHigh(b.rate));
            }
            if let Some(cap) = b.upper_limit {
                if cap < Decimal::ZERO {
                    return Err(BracketError::NegativeLimit(cap));
                }
            }
            // Rates entered as percentages (e.g. 22) become decimals (0.22)
            let rate = if b.rate > Decimal::ONE {
                b.rate / dec!(100)
            } else {
                b.rate
            };
            out.push(Bracket::new(b.upper_limit, rate));
        }

        out.sort_by(|a, b| match (a.upper_limit, b.upper_limit) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        if !out.iter().any(|b| b.upper_limit.is_none()) {
            let last_rate = out.last().map_or(Decimal::ZERO, |b| b.rate);
            out.push(Bracket::new(None, last_rate));
        }

        Ok(BracketSchedule(out))
    }

    /// A single unbounded slab at the given rate (e.g. a flat withholding rate).
    pub fn flat(rate: Decimal) -> Self {
        // A flat rate is always valid input for `new`
        BracketSchedule::new(vec![Bracket::new(None, rate)])
            .unwrap_or_else(|_| BracketSchedule(vec![Bracket::new(None, Decimal::ZERO)]))
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.0
    }

    /// Walk the slabs cumulatively over `amount`, returning the total tax and
    /// the per-slab breakdown. Amounts at or below zero produce no tax.
    pub fn apply(&self, amount: Decimal) -> Progression {
        if amount <= Decimal::ZERO {
            return Progression::default();
        }

        let mut remaining = amount;
        let mut prev_cap = Decimal::ZERO;
        let mut tax = Decimal::ZERO;
        let mut slabs = Vec::new();

        for bracket in &self.0 {
            let width = match bracket.upper_limit {
                Some(cap) => (cap - prev_cap).max(Decimal::ZERO).min(remaining),
                None => remaining,
            };
            if width > Decimal::ZERO {
                let slab_tax = width * bracket.rate;
                slabs.push(Slab {
                    from: prev_cap,
                    to: bracket.upper_limit,
                    rate: bracket.rate,
                    amount: width,
                    tax: slab_tax,
                });
                tax += slab_tax;
                remaining -= width;
            }
            if let Some(cap) = bracket.upper_limit {
                prev_cap = cap;
            }
            if remaining <= Decimal::ZERO {
                break;
            }
        }

        Progression { tax, slabs }
    }
}

impl Default for BracketSchedule {
    fn default() -> Self {
        BracketSchedule(vec![Bracket::new(None, Decimal::ZERO)])
    }
}

/// One row of a slab breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slab {
    pub from: Decimal,
    /// None for the unbounded top slab
    pub to: Option<Decimal>,
    pub rate: Decimal,
    pub amount: Decimal,
    pub tax: Decimal,
}

/// Result of applying a schedule to an amount
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Progression {
    pub tax: Decimal,
    pub slabs: Vec<Slab>,
}
