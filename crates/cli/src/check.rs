//! `vatcheck check`: quarterly ledger vs. hometax reconciliation.

use std::path::{Path, PathBuf};

use vatcheck_config::Settings;
use vatcheck_io::InputFiles;
use vatcheck_recon::model::Dataset;
use vatcheck_recon::{estimate_vat, reconcile, ReconConfig};

use crate::exit_codes::{EXIT_DISCREPANCIES, EXIT_INVALID_CONFIG, EXIT_NO_INPUT, EXIT_OUTPUT_WRITE};
use crate::period::Quarter;
use crate::report::{CheckReport, Summary};
use crate::CliError;

const EXPECTED_FILES: &str = "\
put these exports in the input folder:
  1. ecount: sales ledger (매출장) excel download      -> ecount_매출.xlsx
  2. ecount: purchase ledger (매입장) excel download   -> ecount_매입.xlsx
  3. hometax: e-tax invoices, sales list download     -> hometax_매출.xlsx
  4. hometax: e-tax invoices, purchase list download  -> hometax_매입.xlsx";

pub struct CheckArgs {
    pub quarter: Option<Quarter>,
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    /// Write the JSON result into the settings output folder.
    pub save: bool,
}

/// Default result file for `--save`: `<output_dir>/vatcheck_2026Q1.json`.
pub(crate) fn saved_result_path(settings: &Settings, quarter: Quarter) -> PathBuf {
    settings.output_dir.join(format!("vatcheck_{quarter}.json"))
}

fn check_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Load the rules file named on the command line or in settings, else built-in defaults.
pub(crate) fn load_recon_config(explicit: Option<&Path>, settings: &Settings) -> Result<ReconConfig, CliError> {
    let Some(path) = explicit.or(settings.recon_config.as_deref()) else {
        return Ok(ReconConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        check_err(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = ReconConfig::from_toml(&text)
        .map_err(|e| check_err(EXIT_INVALID_CONFIG, format!("{}: {e}", path.display())))?;
    log::info!("using reconciliation rules from {}", path.display());
    Ok(config)
}

/// A file that fails to load is reported and treated as absent.
fn load_optional(path: Option<&Path>, role: &str) -> Option<Dataset> {
    let Some(path) = path else {
        log::warn!("{role}: no file found");
        return None;
    };
    match vatcheck_io::load_dataset(path) {
        Ok(ds) => Some(ds),
        Err(e) => {
            log::warn!("{role}: cannot load {}: {e}", path.display());
            None
        }
    }
}

pub fn cmd_check(args: CheckArgs, settings: &Settings) -> Result<(), CliError> {
    let config = load_recon_config(args.config.as_deref(), settings)?;
    let quarter = args.quarter.unwrap_or_else(Quarter::current);
    let input_dir = args.input.unwrap_or_else(|| settings.input_dir.clone());

    if vatcheck_io::list_spreadsheets(&input_dir).is_empty() {
        return Err(check_err(
            EXIT_NO_INPUT,
            format!("no spreadsheet files in {}", input_dir.display()),
        )
        .with_hint(EXPECTED_FILES));
    }

    let inputs = vatcheck_io::discover_inputs(&input_dir);
    log_inputs(&inputs);

    let ledger_sales = load_optional(inputs.ledger_sales.as_deref(), "ledger sales");
    let authority_sales = load_optional(inputs.authority_sales.as_deref(), "hometax sales");
    let ledger_purchases = load_optional(inputs.ledger_purchases.as_deref(), "ledger purchases");
    let authority_purchases = load_optional(inputs.authority_purchases.as_deref(), "hometax purchases");

    let sales = reconcile(ledger_sales.as_ref(), authority_sales.as_ref(), "sales", &config);
    let purchases = reconcile(ledger_purchases.as_ref(), authority_purchases.as_ref(), "purchases", &config);
    let vat_estimate = estimate_vat(&sales, &purchases, config.vat_rate);

    let report = CheckReport {
        quarter: quarter.to_string(),
        company_name: settings.company_name.clone(),
        sales,
        purchases,
        vat_estimate,
    };

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| check_err(EXIT_OUTPUT_WRITE, format!("JSON serialization error: {e}")))?;

    let output = args
        .output
        .or_else(|| args.save.then(|| saved_result_path(settings, quarter)));

    if let Some(ref path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                check_err(EXIT_OUTPUT_WRITE, format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(path, &json_str)
            .map_err(|e| check_err(EXIT_OUTPUT_WRITE, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    let period = match quarter.date_range() {
        Some((start, end)) => format!("{quarter} ({start} ~ {end})"),
        None => quarter.to_string(),
    };
    eprint!(
        "{}",
        Summary {
            report: &report,
            period: &period,
            representative: &settings.representative,
            accountant_name: &settings.accountant_name,
        }
    );

    if !report.is_clean() {
        return Err(check_err(
            EXIT_DISCREPANCIES,
            format!("{} discrepancy(ies) found", report.issue_count()),
        ));
    }

    Ok(())
}

fn log_inputs(inputs: &InputFiles) {
    let slots = [
        ("ledger sales", &inputs.ledger_sales),
        ("ledger purchases", &inputs.ledger_purchases),
        ("hometax sales", &inputs.authority_sales),
        ("hometax purchases", &inputs.authority_purchases),
    ];
    for (role, path) in slots {
        match path {
            Some(p) => log::info!("{role}: {}", p.display()),
            None => log::info!("{role}: -"),
        }
    }
    log::debug!("{} of 4 inputs found", inputs.found());
}
