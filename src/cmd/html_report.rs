//! HTML report generation - a self-contained one-screen estimate page

use crate::cmd::{format_amount, format_rate_pct, read_scenario};
use crate::estimate::{calculate, Estimate};
use crate::tax::brackets::Slab;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    /// Scenario JSON file ("-" for stdin)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let scenario = read_scenario(&self.scenario)?;
        let estimate = calculate(&scenario)?;
        let html = generate(&estimate);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML report written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("netpay-report.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Data structure for embedding in HTML as JSON
#[derive(Serialize)]
struct HtmlReportData {
    country: String,
    currency: String,
    fx_rate: f64,
    earned: f64,
    total_comp: f64,
    local_tax: f64,
    net_after_local: f64,
    exempt_earned: f64,
    surcharge: f64,
    cess: f64,
    local_slabs: Vec<SlabRow>,
    overlay: Option<OverlayRows>,
}

#[derive(Serialize)]
struct SlabRow {
    from: String,
    to: String,
    rate: String,
    amount: String,
    tax: String,
}

#[derive(Serialize)]
struct OverlayRows {
    us_taxable: String,
    tentative_tax: String,
    ftc_used: String,
    us_due: String,
    combined_tax: String,
    combined_net: String,
    slabs: Vec<SlabRow>,
}

fn slab_rows(slabs: &[Slab]) -> Vec<SlabRow> {
    slabs
        .iter()
        .map(|s| SlabRow {
            from: format_amount(s.from),
            to: s.to.map_or("∞".to_string(), format_amount),
            rate: format_rate_pct(s.rate),
            amount: format_amount(s.amount),
            tax: format_amount(s.tax),
        })
        .collect()
}

fn to_f64(d: rust_decimal::Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    d.to_f64().unwrap_or(0.0)
}

fn build_report_data(e: &Estimate) -> HtmlReportData {
    HtmlReportData {
        country: e.country.to_string(),
        currency: e.currency.to_string(),
        fx_rate: to_f64(e.fx_rate),
        earned: to_f64(e.earned),
        total_comp: to_f64(e.total_comp),
        local_tax: to_f64(e.local.tax),
        net_after_local: to_f64(e.local.net),
        exempt_earned: to_f64(e.local.exempt_earned),
        surcharge: to_f64(e.local.surcharge),
        cess: to_f64(e.local.cess),
        local_slabs: slab_rows(&e.local.slabs),
        overlay: e.overlay.as_ref().map(|o| OverlayRows {
            us_taxable: format_amount(o.us_taxable),
            tentative_tax: format_amount(o.tentative_tax),
            ftc_used: format_amount(o.ftc_used),
            us_due: format_amount(o.us_due),
            combined_tax: format_amount(o.combined_tax),
            combined_net: format_amount(o.combined_net),
            slabs: slab_rows(&o.slabs),
        }),
    }
}

/// Generate the report page
pub fn generate(estimate: &Estimate) -> String {
    let data = build_report_data(estimate);
    let json_data = serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string());

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Net Pay Estimate</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Gross to Net Pay Estimate</h1>
        <p class="subtitle" id="subtitle"></p>
        <label class="usd-toggle"><input type="checkbox" id="show-usd" onchange="render()"> Show USD equivalents</label>
    </header>

    <main>
        <section class="summary-cards">
            <div class="card">
                <h3>Earned (excl. Y1 RSU)</h3>
                <p class="value" id="card-earned">-</p>
            </div>
            <div class="card">
                <h3>Total Comp (incl. Y1 RSU)</h3>
                <p class="value" id="card-total">-</p>
            </div>
            <div class="card tax">
                <h3>Local Tax</h3>
                <p class="value" id="card-local-tax">-</p>
            </div>
            <div class="card net">
                <h3>Net After Local Tax</h3>
                <p class="value" id="card-local-net">-</p>
            </div>
        </section>

        <section class="data-section">
            <h2>Local Layer</h2>
            <p class="detail" id="local-detail"></p>
            <div class="table-container">
                <table>
                    <thead>
                        <tr><th>From</th><th>To</th><th>Rate</th><th>Amount</th><th>Tax</th></tr>
                    </thead>
                    <tbody id="local-slabs"></tbody>
                </table>
            </div>
        </section>

        <section class="data-section" id="overlay-section" hidden>
            <h2>US Overlay</h2>
            <section class="summary-cards">
                <div class="card">
                    <h3>US Tentative Tax (USD)</h3>
                    <p class="value" id="card-tentative">-</p>
                </div>
                <div class="card">
                    <h3>FTC Used (USD)</h3>
                    <p class="value" id="card-ftc">-</p>
                </div>
                <div class="card tax">
                    <h3>US Tax Due (USD)</h3>
                    <p class="value" id="card-due">-</p>
                </div>
                <div class="card tax">
                    <h3>Combined Tax (USD)</h3>
                    <p class="value" id="card-combined">-</p>
                </div>
                <div class="card net">
                    <h3>Net After All Taxes (USD)</h3>
                    <p class="value" id="card-combined-net">-</p>
                </div>
            </section>
            <p class="detail" id="overlay-detail"></p>
            <div class="table-container">
                <table>
                    <thead>
                        <tr><th>From</th><th>To</th><th>Rate</th><th>Amount</th><th>Tax</th></tr>
                    </thead>
                    <tbody id="overlay-slabs"></tbody>
                </table>
            </div>
        </section>

        <footer>
            <p>Estimates only. Excludes social insurance and detailed residency rules.
               Consult a qualified tax advisor for precise figures.</p>
        </footer>
    </main>

    <script>
const DATA = {json_data};

function fmt(value) {{
    return value.toLocaleString('en-US', {{ minimumFractionDigits: 2, maximumFractionDigits: 2 }});
}}

function money(value, showUsd) {{
    if (showUsd && DATA.fx_rate > 0) {{
        return '$' + fmt(value / DATA.fx_rate);
    }}
    return fmt(value) + ' ' + DATA.currency;
}}

function renderSlabs(tbodyId, slabs) {{
    const tbody = document.getElementById(tbodyId);
    tbody.innerHTML = slabs.map(s =>
        `<tr><td>${{s.from}}</td><td>${{s.to}}</td><td>${{s.rate}}</td>` +
        `<td class="num">${{s.amount}}</td><td class="num">${{s.tax}}</td></tr>`
    ).join('');
}}

function render() {{
    const showUsd = document.getElementById('show-usd').checked;

    document.getElementById('subtitle').textContent =
        DATA.country + ' · ' + DATA.currency + ' · FX ' + DATA.fx_rate + ' per USD';

    document.getElementById('card-earned').textContent = money(DATA.earned, showUsd);
    document.getElementById('card-total').textContent = money(DATA.total_comp, showUsd);
    document.getElementById('card-local-tax').textContent = money(DATA.local_tax, showUsd);
    document.getElementById('card-local-net').textContent = money(DATA.net_after_local, showUsd);

    const details = [];
    if (DATA.exempt_earned > 0) details.push('Exempt earned: ' + money(DATA.exempt_earned, showUsd));
    if (DATA.surcharge > 0) details.push('Surcharge: ' + money(DATA.surcharge, showUsd));
    if (DATA.cess > 0) details.push('Cess: ' + money(DATA.cess, showUsd));
    document.getElementById('local-detail').textContent = details.join(' · ');

    renderSlabs('local-slabs', DATA.local_slabs);

    if (DATA.overlay) {{
        document.getElementById('overlay-section').hidden = false;
        document.getElementById('card-tentative').textContent = '$' + DATA.overlay.tentative_tax;
        document.getElementById('card-ftc').textContent = '$' + DATA.overlay.ftc_used;
        document.getElementById('card-due').textContent = '$' + DATA.overlay.us_due;
        document.getElementById('card-combined').textContent = '$' + DATA.overlay.combined_tax;
        document.getElementById('card-combined-net').textContent = '$' + DATA.overlay.combined_net;
        document.getElementById('overlay-detail').textContent =
            'US Taxable = Earned + RSU − FEIE − Std Ded = $' + DATA.overlay.us_taxable;
        renderSlabs('overlay-slabs', DATA.overlay.slabs);
    }}
}}

render();
    </script>
</body>
</html>
"##,
        css = CSS,
        json_data = json_data
    )
}

const CSS: &str = r#"
:root {
    --bg: #f6f7f9;
    --card-bg: #ffffff;
    --border: #d9dde3;
    --text: #1f2933;
    --muted: #6b7280;
    --accent: #2563eb;
    --tax: #b91c1c;
    --net: #15803d;
}
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
}
header {
    background: var(--card-bg);
    border-bottom: 1px solid var(--border);
    padding: 1rem 2rem;
}
header h1 { margin: 0 0 0.25rem; font-size: 1.4rem; }
.subtitle { margin: 0; color: var(--muted); }
.usd-toggle { display: inline-block; margin-top: 0.5rem; color: var(--muted); }
main { max-width: 960px; margin: 0 auto; padding: 1.5rem 2rem; }
.summary-cards {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
    gap: 1rem;
    margin-bottom: 1.5rem;
}
.card {
    background: var(--card-bg);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 0.75rem 1rem;
}
.card h3 { margin: 0; font-size: 0.75rem; text-transform: uppercase; color: var(--muted); }
.card .value { margin: 0.35rem 0 0; font-size: 1.25rem; font-weight: 600; }
.card.tax .value { color: var(--tax); }
.card.net .value { color: var(--net); }
.data-section { margin-bottom: 2rem; }
.data-section h2 { font-size: 1.1rem; border-bottom: 1px solid var(--border); padding-bottom: 0.35rem; }
.detail { color: var(--muted); }
.table-container { overflow-x: auto; }
table {
    width: 100%;
    border-collapse: collapse;
    background: var(--card-bg);
    border: 1px solid var(--border);
    border-radius: 8px;
}
th, td { padding: 0.5rem 0.75rem; text-align: left; border-bottom: 1px solid var(--border); }
th { font-size: 0.75rem; text-transform: uppercase; color: var(--muted); }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
tr:last-child td { border-bottom: none; }
footer { color: var(--muted); font-size: 0.85rem; }
"#;
