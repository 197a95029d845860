//! Schema command - print expected input formats

use crate::scenario::Scenario;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the scenario format
    JsonSchema,
    /// Bracket CSV header row with column names
    CsvHeader,
    /// Bracket CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Scenario);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", CSV_COLUMNS.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Bracket CSV Format");
        println!("==================");
        println!();
        for (name, required, description) in CSV_FIELD_DESCRIPTIONS {
            let req = if *required { "required" } else { "optional" };
            println!("{:13} ({:8})  {}", name, req, description);
        }
        println!();
        println!("Rows may be unsorted; they are ordered by upper_limit before use.");
        Ok(())
    }
}

const CSV_COLUMNS: &[&str] = &["upper_limit", "rate"];

const CSV_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    (
        "upper_limit",
        false,
        "Upper bound of the slab in schedule currency; blank = unbounded top slab",
    ),
    (
        "rate",
        true,
        "Marginal rate as a decimal (0.22) or a percentage (22)",
    ),
];
