//! Brackets command - show a country's default schedule

use crate::cmd::{format_amount, format_rate_pct};
use crate::scenario::write_brackets_csv;
use crate::tax::country::Country;
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BracketsCommand {
    /// Country whose default schedule to show
    #[arg(short, long, value_enum)]
    country: Country,

    /// Output as CSV (feed back in via `estimate --brackets`)
    #[arg(long)]
    csv: bool,
}

/// Row for the schedule table
#[derive(Debug, Tabled)]
struct BracketRow {
    #[tabled(rename = "Upper Limit")]
    upper_limit: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl BracketsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schedule = self.country.default_brackets();

        if self.csv {
            return write_brackets_csv(&schedule, io::stdout());
        }

        println!();
        println!(
            "DEFAULT BRACKETS ({}, {})",
            self.country,
            self.country.currency_code()
        );
        println!();

        let rows: Vec<BracketRow> = schedule
            .brackets()
            .iter()
            .map(|b| BracketRow {
                upper_limit: b.upper_limit.map_or("∞".to_string(), format_amount),
                rate: format_rate_pct(b.rate),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{table}");
        println!();
        Ok(())
    }
}
