use clap::{Parser, Subcommand};

mod cmd;
mod estimate;
mod pay;
mod scenario;
mod tax;

#[derive(Parser, Debug)]
#[command(
    name = "netpay",
    version,
    about = "Gross-to-net pay estimator for expats"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate net pay for a scenario
    Estimate(cmd::estimate::EstimateCommand),
    /// Show a country's default bracket schedule
    Brackets(cmd::brackets::BracketsCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
    /// Generate a one-screen HTML report
    Html(cmd::html_report::HtmlCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate(cmd) => cmd.exec(),
        Commands::Brackets(cmd) => cmd.exec(),
        Commands::Schema(cmd) => cmd.exec(),
        Commands::Html(cmd) => cmd.exec(),
    }
}
