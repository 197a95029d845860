use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// First-year compensation inputs, in the currency of the work country
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Compensation {
    /// Annual base pay
    #[serde(default)]
    pub base: Decimal,
    /// Variable pay as a percentage of base (e.g. 15 for 15%)
    #[serde(default)]
    pub variable_pct: Decimal,
    /// Year-1 cash RSU
    #[serde(default)]
    pub crsu: Decimal,
    /// Joining bonus
    #[serde(default)]
    pub sign_on: Decimal,
    /// Year-1 RSU vest value
    #[serde(default)]
    pub y1_rsu: Decimal,
}

impl Compensation {
    /// Earned compensation (excluding Y1 RSU)
    pub fn earned(&self) -> Decimal {
        self.base + self.base * self.variable_pct / dec!(100) + self.crsu + self.sign_on
    }

    /// Total compensation (including Y1 RSU)
    pub fn total(&self) -> Decimal {
        self.earned() + self.y1_rsu
    }

    /// Name of the first negative component, if any
    pub fn negative_component(&self) -> Option<&'static str> {
        [
            ("base", self.base),
            ("variable_pct", self.variable_pct),
            ("crsu", self.crsu),
            ("sign_on", self.sign_on),
            ("y1_rsu", self.y1_rsu),
        ]
        .into_iter()
        .find(|(_, v)| *v < Decimal::ZERO)
        .map(|(name, _)| name)
    }
}
