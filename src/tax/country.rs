use clap::ValueEnum;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pay::Compensation;
use crate::tax::brackets::{Bracket, BracketSchedule, Slab};

/// Country of work. Each country carries its currency, a default FX rate
/// (local units per USD) and a default bracket schedule, all overridable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Country {
    Korea,
    Taiwan,
    #[default]
    Singapore,
    Japan,
    India,
    UnitedStates,
}

/// Korea local layer is a flat withholding-style rate
const KOREA_FLAT_RATE: Decimal = dec!(0.21);

/// Taiwan foreign special professional rule: 50% of earned income above
/// NTD 3,000,000 is exempt (RSUs excluded from the exemption)
const TAIWAN_EXEMPT_THRESHOLD: Decimal = dec!(3000000);

/// India health and education cess on tax plus surcharge
const INDIA_CESS_RATE: Decimal = dec!(0.04);

impl Country {
    pub fn currency_code(&self) -> &'static str {
        match self {
            Country::Korea => "KRW",
            Country::Taiwan => "NTD",
            Country::Singapore => "SGD",
            Country::Japan => "JPY",
            Country::India => "INR",
            Country::UnitedStates => "USD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Country::Korea => "Korea",
            Country::Taiwan => "Taiwan",
            Country::Singapore => "Singapore",
            Country::Japan => "Japan",
            Country::India => "India",
            Country::UnitedStates => "United States",
        }
    }

    /// Default FX rate, local units per USD
    pub fn default_fx(&self) -> Decimal {
        match self {
            Country::Korea => dec!(1350),
            Country::Taiwan => dec!(32),
            Country::Singapore => dec!(1.35),
            Country::Japan => dec!(155),
            Country::India => dec!(84),
            Country::UnitedStates => Decimal::ONE,
        }
    }

    /// Default progressive schedule in local currency. Korea is modeled as a
    /// single flat slab so it still yields a breakdown.
    pub fn default_brackets(&self) -> BracketSchedule {
        match self {
            Country::Korea => BracketSchedule::flat(KOREA_FLAT_RATE),
            Country::Taiwan => schedule_of(&[
                (Some(dec!(590000)), dec!(0.05)),
                (Some(dec!(1330000)), dec!(0.12)),
                (Some(dec!(2660000)), dec!(0.20)),
                (Some(dec!(4980000)), dec!(0.30)),
                (None, dec!(0.40)),
            ]),
            Country::Singapore => schedule_of(&[
                (Some(dec!(20000)), dec!(0)),
                (Some(dec!(30000)), dec!(0.02)),
                (Some(dec!(40000)), dec!(0.035)),
                (Some(dec!(80000)), dec!(0.07)),
                (Some(dec!(120000)), dec!(0.115)),
                (Some(dec!(160000)), dec!(0.15)),
                (Some(dec!(200000)), dec!(0.18)),
                (Some(dec!(240000)), dec!(0.19)),
                (Some(dec!(280000)), dec!(0.195)),
                (Some(dec!(320000)), dec!(0.20)),
                (Some(dec!(500000)), dec!(0.22)),
                (Some(dec!(1000000)), dec!(0.23)),
                (None, dec!(0.24)),
            ]),
            Country::Japan => schedule_of(&[
                (Some(dec!(1950000)), dec!(0.05)),
                (Some(dec!(3300000)), dec!(0.10)),
                (Some(dec!(6950000)), dec!(0.20)),
                (Some(dec!(9000000)), dec!(0.23)),
                (Some(dec!(18000000)), dec!(0.33)),
                (Some(dec!(40000000)), dec!(0.40)),
                (None, dec!(0.45)),
            ]),
            Country::India => schedule_of(&[
                (Some(dec!(400000)), dec!(0)),
                (Some(dec!(800000)), dec!(0.05)),
                (Some(dec!(1200000)), dec!(0.10)),
                (Some(dec!(1600000)), dec!(0.15)),
                (Some(dec!(2000000)), dec!(0.20)),
                (Some(dec!(2400000)), dec!(0.25)),
                (None, dec!(0.30)),
            ]),
            Country::UnitedStates => us_federal_brackets(),
        }
    }

    /// India surcharge rate by total income (new regime tiers)
    pub fn india_surcharge_rate(total_income: Decimal) -> Decimal {
        if total_income > dec!(20000000) {
            dec!(0.25)
        } else if total_income > dec!(10000000) {
            dec!(0.15)
        } else if total_income > dec!(5000000) {
            dec!(0.10)
        } else {
            Decimal::ZERO
        }
    }

    /// Compute the local tax layer for this country
    pub fn local_tax(&self, pay: &Compensation, schedule: &BracketSchedule) -> LocalTax {
        let earned = pay.earned();
        let total = pay.total();

        match self {
            Country::Taiwan => {
                let above = (earned - TAIWAN_EXEMPT_THRESHOLD).max(Decimal::ZERO);
                let exempt = above / dec!(2);
                let taxable = (earned - exempt).max(Decimal::ZERO) + pay.y1_rsu;
                let p = schedule.apply(taxable);
                LocalTax {
                    taxable,
                    exempt_earned: exempt,
                    base_tax: p.tax,
                    surcharge: Decimal::ZERO,
                    cess: Decimal::ZERO,
                    tax: p.tax,
                    net: total - p.tax,
                    slabs: p.slabs,
                }
            }
            Country::India => {
                let p = schedule.apply(total);
                let surcharge = p.tax * Self::india_surcharge_rate(total);
                let cess = INDIA_CESS_RATE * (p.tax + surcharge);
                let tax = p.tax + surcharge + cess;
                LocalTax {
                    taxable: total,
                    exempt_earned: Decimal::ZERO,
                    base_tax: p.tax,
                    surcharge,
                    cess,
                    tax,
                    net: total - tax,
                    slabs: p.slabs,
                }
            }
            // Korea (flat single slab), Singapore, Japan, United States
            _ => {
                let p = schedule.apply(total);
                LocalTax {
                    taxable: total,
                    exempt_earned: Decimal::ZERO,
                    base_tax: p.tax,
                    surcharge: Decimal::ZERO,
                    cess: Decimal::ZERO,
                    tax: p.tax,
                    net: total - p.tax,
                    slabs: p.slabs,
                }
            }
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// US federal schedule (single filer), also used by the overlay
pub fn us_federal_brackets() -> BracketSchedule {
    schedule_of(&[
        (Some(dec!(11600)), dec!(0.10)),
        (Some(dec!(47150)), dec!(0.12)),
        (Some(dec!(100525)), dec!(0.22)),
        (Some(dec!(191950)), dec!(0.24)),
        (Some(dec!(243725)), dec!(0.32)),
        (Some(dec!(609350)), dec!(0.35)),
        (None, dec!(0.37)),
    ])
}

/// Build a schedule from a static rate table. Default tables are valid, so
/// construction cannot fail in practice.
fn schedule_of(rows: &[(Option<Decimal>, Decimal)]) -> BracketSchedule {
    BracketSchedule::new(
        rows.iter()
            .map(|(cap, rate)| Bracket::new(*cap, *rate))
            .collect(),
    )
    .unwrap_or_default()
}

/// Output of a country's local tax layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalTax {
    /// Amount the schedule was applied to (after country exemptions)
    pub taxable: Decimal,
    /// Earned income excluded by a country rule (Taiwan only)
    pub exempt_earned: Decimal,
    /// Tax from the bracket schedule before additions
    pub base_tax: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    /// Total local tax including surcharge and cess
    pub tax: Decimal,
    /// Total comp minus total local tax
    pub net: Decimal,
    pub slabs: Vec<Slab>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay(base: Decimal, rsu: Decimal) -> Compensation {
        Compensation {
            base,
            y1_rsu: rsu,
            ..Default::default()
        }
    }

    #[test]
    fn currency_codes() {
        assert_eq!(Country::Korea.currency_code(), "KRW");
        assert_eq!(Country::Taiwan.currency_code(), "NTD");
        assert_eq!(Country::Singapore.currency_code(), "SGD");
        assert_eq!(Country::Japan.currency_code(), "JPY");
        assert_eq!(Country::India.currency_code(), "INR");
        assert_eq!(Country::UnitedStates.currency_code(), "USD");
    }

    #[test]
    fn default_fx_rates() {
        assert_eq!(Country::Korea.default_fx(), dec!(1350));
        assert_eq!(Country::Singapore.default_fx(), dec!(1.35));
        assert_eq!(Country::UnitedStates.default_fx(), Decimal::ONE);
    }

    #[test]
    fn korea_flat_rate() {
        let c = Country::Korea;
        let result = c.local_tax(&pay(dec!(100000000), dec!(20000000)), &c.default_brackets());
        // 21% of 120,000,000
        assert_eq!(result.tax, dec!(25200000));
        assert_eq!(result.net, dec!(94800000));
        assert_eq!(result.slabs.len(), 1);
    }

    #[test]
    fn singapore_progressive() {
        let c = Country::Singapore;
        let result = c.local_tax(&pay(dec!(100000), Decimal::ZERO), &c.default_brackets());
        // 0 + 200 + 350 + 2800 + 2300
        assert_eq!(result.tax, dec!(5650));
        assert_eq!(result.net, dec!(94350));
    }

    #[test]
    fn japan_progressive() {
        let c = Country::Japan;
        let result = c.local_tax(&pay(dec!(10000000), Decimal::ZERO), &c.default_brackets());
        assert_eq!(result.tax, dec!(1764000));
    }

    #[test]
    fn taiwan_exemption_applies_to_earned_only() {
        let c = Country::Taiwan;
        let result = c.local_tax(&pay(dec!(5000000), Decimal::ZERO), &c.default_brackets());
        // 50% of the 2,000,000 above the threshold is exempt
        assert_eq!(result.exempt_earned, dec!(1000000));
        assert_eq!(result.taxable, dec!(4000000));
        // 29,500 + 88,800 + 266,000 + 402,000
        assert_eq!(result.tax, dec!(786300));
    }

    #[test]
    fn taiwan_rsu_not_exempt() {
        let c = Country::Taiwan;
        let with_rsu = c.local_tax(&pay(dec!(3000000), dec!(2000000)), &c.default_brackets());
        // No earned income above the threshold, so nothing exempt
        assert_eq!(with_rsu.exempt_earned, Decimal::ZERO);
        assert_eq!(with_rsu.taxable, dec!(5000000));
    }

    #[test]
    fn taiwan_below_threshold_no_exemption() {
        let c = Country::Taiwan;
        let result = c.local_tax(&pay(dec!(2000000), Decimal::ZERO), &c.default_brackets());
        assert_eq!(result.exempt_earned, Decimal::ZERO);
        assert_eq!(result.taxable, dec!(2000000));
    }

    #[test]
    fn india_surcharge_tiers() {
        assert_eq!(Country::india_surcharge_rate(dec!(4000000)), Decimal::ZERO);
        assert_eq!(Country::india_surcharge_rate(dec!(5000001)), dec!(0.10));
        assert_eq!(Country::india_surcharge_rate(dec!(10000001)), dec!(0.15));
        assert_eq!(Country::india_surcharge_rate(dec!(20000001)), dec!(0.25));
        // Boundary values stay in the lower tier
        assert_eq!(Country::india_surcharge_rate(dec!(5000000)), Decimal::ZERO);
        assert_eq!(Country::india_surcharge_rate(dec!(20000000)), dec!(0.15));
    }

    #[test]
    fn india_surcharge_and_cess() {
        let c = Country::India;
        let result = c.local_tax(&pay(dec!(6000000), Decimal::ZERO), &c.default_brackets());
        assert_eq!(result.base_tax, dec!(1380000));
        assert_eq!(result.surcharge, dec!(138000.0));
        assert_eq!(result.cess, dec!(60720.00));
        assert_eq!(result.tax, dec!(1578720.00));
    }

    #[test]
    fn us_federal_schedule() {
        let result = Country::UnitedStates
            .local_tax(&pay(dec!(100000), Decimal::ZERO), &us_federal_brackets());
        // 1,160 + 4,266 + 11,627
        assert_eq!(result.tax, dec!(17053.00));
    }
}
