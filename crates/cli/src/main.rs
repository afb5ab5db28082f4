// vatcheck CLI - quarterly VAT self-check against hometax records

mod check;
mod exit_codes;
mod period;
mod report;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;

use vatcheck_config::Settings;
use vatcheck_recon::mapper::map_columns;
use vatcheck_recon::model::{CanonicalField, Cell};
use vatcheck_recon::resolve::{first_mapped, resolve_amount};
use vatcheck_recon::summary::{summarize_side, vat_from_totals};
use vatcheck_recon::normalize_amount;

use check::{cmd_check, load_recon_config, CheckArgs};
use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use period::Quarter;
use util::{format_thousands, format_won, pad_right};

#[derive(Parser)]
#[command(name = "vatcheck")]
#[command(about = "Reconcile ledger exports against hometax e-tax invoice lists")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug; RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file [default: <config dir>/vatcheck/settings.json]
    #[arg(long, env = "VATCHECK_SETTINGS", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a quarter's sales and purchases (exit 0 = match, exit 1 = discrepancies)
    #[command(after_help = "\
Examples:
  vatcheck check
  vatcheck check --quarter 2026Q1 --input ./input
  vatcheck check --json > result.json
  vatcheck check --output output/check_2026Q1.json --config rules.toml
  vatcheck check --quarter 2026Q1 --save")]
    Check {
        /// Filing quarter, e.g. 2026Q1 [default: current quarter]
        #[arg(long, short = 'q')]
        quarter: Option<Quarter>,

        /// Folder holding the ledger and hometax exports [default: settings input_dir]
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Reconciliation rules (TOML) overriding the built-in header table
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the JSON result to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the JSON result to <output_dir>/vatcheck_<quarter>.json
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Show how a file's headers map to canonical fields
    #[command(after_help = "\
Examples:
  vatcheck columns input/hometax_매출.xlsx
  vatcheck columns ledger.csv --config rules.toml")]
    Columns {
        /// Spreadsheet to inspect (csv, tsv, xlsx, xls, ods)
        file: PathBuf,

        /// Reconciliation rules (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Project VAT payable from sales and purchase supply totals
    #[command(after_help = "\
Examples:
  vatcheck estimate --sales 33,500,000 --purchases 13,500,000
  vatcheck estimate --sales 1200000원 --purchases 0 --rate 0.1")]
    Estimate {
        /// Sales supply total (separators and 원 allowed)
        #[arg(long)]
        sales: String,

        /// Purchase supply total
        #[arg(long)]
        purchases: String,

        /// VAT rate [default: rules vat_rate, 0.1]
        #[arg(long)]
        rate: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli.settings {
        Some(ref path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Check { quarter, input, config, json, output, save } => {
            cmd_check(CheckArgs { quarter, input, config, json, output, save }, &settings)
        }
        Commands::Columns { file, config } => cmd_columns(file, config, &settings),
        Commands::Estimate { sales, purchases, rate, json } => {
            cmd_estimate(&sales, &purchases, rate, json, &settings)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// columns
// ============================================================================

fn cmd_columns(file: PathBuf, config: Option<PathBuf>, settings: &Settings) -> Result<(), CliError> {
    let config = load_recon_config(config.as_deref(), settings)?;
    let dataset = vatcheck_io::load_dataset(&file).map_err(CliError::args)?;
    let mapping = map_columns(&dataset, &config);

    println!("{} ({} rows)", file.display(), dataset.len());
    for field in CanonicalField::ALL {
        let header = mapping.get(field).unwrap_or("-");
        println!("  {}{}", pad_right(field.as_str(), 18), header);
    }

    let unmapped: Vec<&str> = dataset
        .headers()
        .iter()
        .map(String::as_str)
        .filter(|h| !mapping.iter().any(|(_, mapped)| mapped == *h))
        .collect();
    if !unmapped.is_empty() {
        println!("unmapped: {}", unmapped.join(", "));
    }

    match first_mapped(&mapping, &config.key_preference) {
        Some(key) => println!("key: {key}"),
        None => println!("key: none (rows cannot be grouped)"),
    }
    match resolve_amount(&mapping, &config) {
        Some(amount) => {
            let side = summarize_side(Some(&dataset), &mapping, &config);
            println!("amount: {amount}, total {}", format_thousands(side.total));
        }
        None => println!("amount: none (total is 0)"),
    }

    Ok(())
}

// ============================================================================
// estimate
// ============================================================================

fn cmd_estimate(
    sales: &str,
    purchases: &str,
    rate: Option<f64>,
    json: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let rate = match rate {
        Some(r) => r,
        None => load_recon_config(None, settings)?.vat_rate,
    };
    if !(0.0..=1.0).contains(&rate) {
        return Err(CliError::args(format!("--rate must be between 0 and 1, got {rate}")));
    }

    let sales_total = normalize_amount(&Cell::Text(sales.to_string()));
    let purchase_total = normalize_amount(&Cell::Text(purchases.to_string()));
    let estimate = vat_from_totals(sales_total, purchase_total, rate);

    if json {
        let out = serde_json::to_string_pretty(&estimate)
            .map_err(|e| CliError::args(format!("JSON serialization error: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    println!("{}{:>14}", pad_right("sales tax", 16), format_won(estimate.sales_tax));
    println!("{}{:>14}", pad_right("purchase tax", 16), format_won(estimate.purchase_tax));
    println!("{}{:>14}", pad_right("payable", 16), format_won(estimate.payable));
    Ok(())
}
