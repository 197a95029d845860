//! Estimate command - the one-screen gross-to-net estimate

use crate::cmd::{format_amount, format_rate_pct, read_brackets_file, read_scenario};
use crate::estimate::{calculate, Estimate};
use crate::scenario::{Scenario, UsOverlay};
use crate::tax::brackets::Slab;
use crate::tax::country::Country;
use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct EstimateCommand {
    /// Scenario JSON file ("-" for stdin); flags below override its fields
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Country of work
    #[arg(short, long, value_enum)]
    country: Option<Country>,

    /// Annual base pay, local currency
    #[arg(long)]
    base: Option<Decimal>,

    /// Variable pay as a percentage of base
    #[arg(long)]
    variable_pct: Option<Decimal>,

    /// Year-1 cash RSU, local currency
    #[arg(long)]
    crsu: Option<Decimal>,

    /// Joining bonus, local currency
    #[arg(long)]
    sign_on: Option<Decimal>,

    /// Year-1 RSU vest value, local currency
    #[arg(long)]
    y1_rsu: Option<Decimal>,

    /// FX rate, local units per USD (defaults to the country rate)
    #[arg(long)]
    fx: Option<Decimal>,

    /// Apply the US citizen / green-card holder overlay
    #[arg(long)]
    us_person: bool,

    /// Foreign Earned Income Exclusion, USD (implies --us-person)
    #[arg(long)]
    feie: Option<Decimal>,

    /// US standard deduction, USD (implies --us-person)
    #[arg(long)]
    standard_deduction: Option<Decimal>,

    /// Bracket CSV (upper_limit,rate) overriding the country schedule
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Bracket CSV overriding the US federal schedule
    #[arg(long)]
    us_brackets: Option<PathBuf>,

    /// Show USD equivalents of the local layer
    #[arg(long)]
    usd: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Output the flat export row as CSV
    #[arg(long)]
    csv: bool,
}

impl EstimateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let scenario = self.build_scenario()?;
        debug!("resolved scenario: {scenario:?}");
        let estimate = calculate(&scenario)?;

        if self.csv {
            self.write_csv(&estimate)
        } else if self.json {
            self.print_json(&estimate)
        } else {
            self.print_estimate(&estimate);
            Ok(())
        }
    }

    /// Load the scenario file if given, then layer CLI flags over it
    fn build_scenario(&self) -> anyhow::Result<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => read_scenario(path)?,
            None => {
                let country = self.country.ok_or_else(|| {
                    anyhow::anyhow!("either --scenario or --country is required")
                })?;
                Scenario::new(country)
            }
        };

        if let Some(country) = self.country {
            scenario.country = country;
        }
        if let Some(base) = self.base {
            scenario.pay.base = base;
        }
        if let Some(pct) = self.variable_pct {
            scenario.pay.variable_pct = pct;
        }
        if let Some(crsu) = self.crsu {
            scenario.pay.crsu = crsu;
        }
        if let Some(sign_on) = self.sign_on {
            scenario.pay.sign_on = sign_on;
        }
        if let Some(rsu) = self.y1_rsu {
            scenario.pay.y1_rsu = rsu;
        }
        if let Some(fx) = self.fx {
            scenario.fx_rate = Some(fx);
        }

        if let Some(path) = &self.brackets {
            scenario.brackets = Some(read_brackets_file(path)?);
        }

        if self.us_person || self.feie.is_some() || self.standard_deduction.is_some() {
            let overlay = scenario.us_overlay.get_or_insert_with(UsOverlay::default);
            if let Some(feie) = self.feie {
                overlay.params.feie = feie;
            }
            if let Some(sd) = self.standard_deduction {
                overlay.params.standard_deduction = sd;
            }
        }
        if let Some(path) = &self.us_brackets {
            let overlay = scenario.us_overlay.get_or_insert_with(UsOverlay::default);
            overlay.brackets = Some(read_brackets_file(path)?);
        }

        Ok(scenario)
    }

    fn print_estimate(&self, e: &Estimate) {
        let cur = e.currency;

        println!();
        println!("NET PAY ESTIMATE ({}, {})", e.country, cur);
        println!();
        println!("  Earned (excl. Y1 RSU): {}", format_amount(e.earned));
        println!("  Total Comp (incl. Y1 RSU): {}", format_amount(e.total_comp));
        println!();

        println!("LOCAL LAYER ({})", e.country);
        if !e.local.slabs.is_empty() {
            print_slab_table(&e.local.slabs);
        }
        if e.local.exempt_earned > Decimal::ZERO {
            println!(
                "  Exempt earned: {} | Taxable: {}",
                format_amount(e.local.exempt_earned),
                format_amount(e.local.taxable)
            );
        }
        if e.local.surcharge > Decimal::ZERO || e.local.cess > Decimal::ZERO {
            println!(
                "  Base tax: {} | Surcharge: {} | Cess: {}",
                format_amount(e.local.base_tax),
                format_amount(e.local.surcharge),
                format_amount(e.local.cess)
            );
        }
        println!(
            "  Local Tax ({}): {} | Net After Local Tax ({}): {}",
            cur,
            format_amount(e.local.tax),
            cur,
            format_amount(e.local.net)
        );
        if self.usd {
            println!(
                "  Local Tax (USD): {} | Net After Local Tax (USD): {}",
                format_amount(e.usd.local_tax),
                format_amount(e.usd.local_net)
            );
        }
        println!();

        if let Some(overlay) = &e.overlay {
            println!("US OVERLAY (ON)");
            println!(
                "  US Taxable = Earned + RSU - FEIE - Std Ded = {}",
                format_amount(overlay.us_taxable)
            );
            if !overlay.slabs.is_empty() {
                print_slab_table(&overlay.slabs);
            }
            println!(
                "  US Tentative Tax (USD): {} | FTC Used (USD): {} | US Tax Due (USD): {}",
                format_amount(overlay.tentative_tax),
                format_amount(overlay.ftc_used),
                format_amount(overlay.us_due)
            );
            println!(
                "  Combined Tax (USD): {} | Net After All Taxes (USD): {}",
                format_amount(overlay.combined_tax),
                format_amount(overlay.combined_net)
            );
            println!();
        }
    }

    fn print_json(&self, e: &Estimate) -> anyhow::Result<()> {
        let data = EstimateData::from(e);
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }

    fn write_csv(&self, e: &Estimate) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        wtr.serialize(ExportRecord::from(e))?;
        wtr.flush()?;
        Ok(())
    }
}

/// Row for slab breakdown tables
#[derive(Debug, Tabled)]
struct SlabRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

fn print_slab_table(slabs: &[Slab]) {
    let rows: Vec<SlabRow> = slabs
        .iter()
        .map(|s| SlabRow {
            from: format_amount(s.from),
            to: s.to.map_or("∞".to_string(), format_amount),
            rate: format_rate_pct(s.rate),
            amount: format_amount(s.amount),
            tax: format_amount(s.tax),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    for line in table.lines() {
        println!("  {line}");
    }
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct EstimateData {
    country: String,
    currency: String,
    fx_rate: String,
    earned: String,
    total_comp: String,
    local_tax: String,
    net_after_local: String,
    local_tax_usd: String,
    net_after_local_usd: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<OverlayData>,
}

#[derive(Debug, Serialize)]
struct OverlayData {
    us_taxable: String,
    us_tentative_tax: String,
    ftc_used: String,
    us_tax_due: String,
    combined_tax: String,
    net_after_all_taxes: String,
}

impl From<&Estimate> for EstimateData {
    fn from(e: &Estimate) -> Self {
        EstimateData {
            country: e.country.to_string(),
            currency: e.currency.to_string(),
            fx_rate: e.fx_rate.normalize().to_string(),
            earned: format_amount(e.earned),
            total_comp: format_amount(e.total_comp),
            local_tax: format_amount(e.local.tax),
            net_after_local: format_amount(e.local.net),
            local_tax_usd: format_amount(e.usd.local_tax),
            net_after_local_usd: format_amount(e.usd.local_net),
            overlay: e.overlay.as_ref().map(|o| OverlayData {
                us_taxable: format_amount(o.us_taxable),
                us_tentative_tax: format_amount(o.tentative_tax),
                ftc_used: format_amount(o.ftc_used),
                us_tax_due: format_amount(o.us_due),
                combined_tax: format_amount(o.combined_tax),
                net_after_all_taxes: format_amount(o.combined_net),
            }),
        }
    }
}

/// Flat export row, the CSV download of the original screen
#[derive(Debug, Serialize)]
struct ExportRecord {
    country: String,
    currency: String,
    fx_to_usd: String,
    base: String,
    variable_pct: String,
    crsu: String,
    sign_on: String,
    y1_rsu: String,
    earned: String,
    total_comp: String,
    local_tax: String,
    net_after_local: String,
    us_tentative_tax: String,
    ftc_used: String,
    us_tax_due: String,
    combined_tax_usd: String,
    net_after_all_taxes_usd: String,
}

impl From<&Estimate> for ExportRecord {
    fn from(e: &Estimate) -> Self {
        let overlay = e.overlay.as_ref();
        let fmt_overlay =
            |f: fn(&crate::tax::overlay::OverlayResult) -> Decimal| -> String {
                overlay.map_or(String::new(), |o| format_amount(f(o)))
            };
        ExportRecord {
            country: e.country.to_string(),
            currency: e.currency.to_string(),
            fx_to_usd: e.fx_rate.normalize().to_string(),
            base: format_amount(e.pay.base),
            variable_pct: e.pay.variable_pct.normalize().to_string(),
            crsu: format_amount(e.pay.crsu),
            sign_on: format_amount(e.pay.sign_on),
            y1_rsu: format_amount(e.pay.y1_rsu),
            earned: format_amount(e.earned),
            total_comp: format_amount(e.total_comp),
            local_tax: format_amount(e.local.tax),
            net_after_local: format_amount(e.local.net),
            us_tentative_tax: fmt_overlay(|o| o.tentative_tax),
            ftc_used: fmt_overlay(|o| o.ftc_used),
            us_tax_due: fmt_overlay(|o| o.us_due),
            combined_tax_usd: fmt_overlay(|o| o.combined_tax),
            net_after_all_taxes_usd: fmt_overlay(|o| o.combined_net),
        }
    }
}
