use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::pay::Compensation;
use crate::tax::brackets::{Bracket, BracketSchedule};
use crate::tax::country::Country;
use crate::tax::overlay::OverlayParams;

/// Unified JSON input format for an estimate
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Country of work
    pub country: Country,
    /// FX rate, local units per USD (defaults to the country rate)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_rate: Option<Decimal>,
    /// Compensation inputs in local currency
    #[serde(default)]
    pub pay: Compensation,
    /// Override of the country's bracket schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brackets: Option<Vec<Bracket>>,
    /// US citizen / green-card holder overlay; omit to disable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_overlay: Option<UsOverlay>,
}

impl Scenario {
    pub fn new(country: Country) -> Self {
        Scenario {
            country,
            fx_rate: None,
            pay: Compensation::default(),
            brackets: None,
            us_overlay: None,
        }
    }
}

/// US overlay settings within a scenario
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UsOverlay {
    #[serde(flatten)]
    pub params: OverlayParams,
    /// Override of the US federal schedule (USD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brackets: Option<Vec<Bracket>>,
}

impl Default for UsOverlay {
    fn default() -> Self {
        UsOverlay {
            params: OverlayParams::default(),
            brackets: None,
        }
    }
}

/// Read a scenario document (JSON)
pub fn read_scenario_json<R: Read>(reader: R) -> anyhow::Result<Scenario> {
    let scenario = serde_json::from_reader(reader)?;
    Ok(scenario)
}

/// Bracket CSV row: `upper_limit,rate` with a blank upper_limit for the
/// unbounded top slab
#[derive(Debug, Serialize, Deserialize)]
struct BracketRecord {
    upper_limit: Option<Decimal>,
    rate: Decimal,
}

/// Read an editable bracket schedule from CSV
pub fn read_brackets_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Bracket>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut brackets = Vec::new();
    for record in rdr.deserialize() {
        let record: BracketRecord = record?;
        brackets.push(Bracket::new(record.upper_limit, record.rate));
    }
    Ok(brackets)
}

/// Write a schedule as bracket CSV, round-trippable into `read_brackets_csv`
pub fn write_brackets_csv<W: Write>(schedule: &BracketSchedule, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bracket in schedule.brackets() {
        wtr.serialize(BracketRecord {
            upper_limit: bracket.upper_limit,
            rate: bracket.rate,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn scenario_minimal_json() {
        let json = r#"{ "country": "japan" }"#;
        let s = read_scenario_json(json.as_bytes()).unwrap();
        assert_eq!(s.country, Country::Japan);
        assert_eq!(s.fx_rate, None);
        assert_eq!(s.pay, Compensation::default());
        assert!(s.us_overlay.is_none());
    }

    #[test]
    fn scenario_full_json() {
        let json = r#"{
            "country": "singapore",
            "fx_rate": 1.40,
            "pay": { "base": 150000, "variable_pct": 10, "sign_on": 20000, "y1_rsu": 30000 },
            "us_overlay": { "feie": 120000, "standard_deduction": 14600 }
        }"#;
        let s = read_scenario_json(json.as_bytes()).unwrap();
        assert_eq!(s.fx_rate, Some(dec!(1.40)));
        assert_eq!(s.pay.base, dec!(150000));
        let overlay = s.us_overlay.unwrap();
        assert_eq!(overlay.params.feie, dec!(120000));
        assert_eq!(overlay.params.standard_deduction, dec!(14600));
    }

    #[test]
    fn overlay_defaults_filled_in() {
        let json = r#"{ "country": "korea", "us_overlay": {} }"#;
        let s = read_scenario_json(json.as_bytes()).unwrap();
        let overlay = s.us_overlay.unwrap();
        assert_eq!(overlay.params.feie, dec!(126500));
        assert_eq!(overlay.params.standard_deduction, dec!(14600));
    }

    #[test]
    fn brackets_csv_round_trip() {
        let csv = "upper_limit,rate\n20000,0\n320000,0.20\n,0.22\n";
        let brackets = read_brackets_csv(csv.as_bytes()).unwrap();
        assert_eq!(brackets.len(), 3);
        assert_eq!(brackets[0].upper_limit, Some(dec!(20000)));
        assert_eq!(brackets[2].upper_limit, None);
        assert_eq!(brackets[2].rate, dec!(0.22));

        let schedule = BracketSchedule::new(brackets).unwrap();
        let mut out = Vec::new();
        write_brackets_csv(&schedule, &mut out).unwrap();
        let reparsed = read_brackets_csv(out.as_slice()).unwrap();
        assert_eq!(reparsed, schedule.brackets());
    }

    #[test]
    fn brackets_csv_bad_rate_is_error() {
        let csv = "upper_limit,rate\n20000,abc\n";
        assert!(read_brackets_csv(csv.as_bytes()).is_err());
    }
}
