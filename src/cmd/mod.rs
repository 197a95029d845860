pub mod brackets;
pub mod estimate;
pub mod html_report;
pub mod schema;

use crate::scenario::{self, Scenario};
use crate::tax::brackets::Bracket;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a scenario document (JSON) from a file, or stdin with "-"
pub fn read_scenario(path: &Path) -> anyhow::Result<Scenario> {
    if path.as_os_str() == "-" {
        read_scenario_from_stdin()
    } else {
        let file = File::open(path)?;
        scenario::read_scenario_json(BufReader::new(file))
    }
}

fn read_scenario_from_stdin() -> anyhow::Result<Scenario> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe a scenario to stdin.");
    }

    scenario::read_scenario_json(io::Cursor::new(buffer))
}

/// Read an editable bracket schedule from a CSV file
pub fn read_brackets_file(path: &Path) -> anyhow::Result<Vec<Bracket>> {
    let file = File::open(path)?;
    scenario::read_brackets_csv(BufReader::new(file))
}

/// Format a monetary amount for display (2dp)
pub(crate) fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Format a rate as a percentage, e.g. "11.5%"
pub(crate) fn format_rate_pct(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).round_dp(2).normalize())
}
