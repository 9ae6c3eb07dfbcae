use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validations_core::{Labeled, ValidationFailure};
use validations_db::{registered_callbacks_or_error, EngineConfig, Handle, WriteError};

mod records;

use records::Customer;

/// Run customer records through the validation callbacks and report every
/// failure, grouped by label.
#[derive(Debug, Parser)]
#[command(name = "validations-check", version)]
struct Args {
    /// JSON file holding an array of customers. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Write without validating (overrides `VALIDATIONS_SKIP`).
    #[arg(long)]
    skip_validations: bool,

    /// Run the update chain instead of the create chain.
    #[arg(long)]
    update: bool,

    /// Fail unless the validation callbacks are registered.
    #[arg(long)]
    require_registered: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "validations_cli=info,validations_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let args = Args::parse();
    let mut config = EngineConfig::from_env()?;
    if args.skip_validations {
        config.skip_validations = true;
    }
    tracing::info!(
        skip_validations = config.skip_validations,
        register_validations = config.register_validations,
        "Loaded engine configuration"
    );

    // --- Handle ---
    let handle = Handle::from_config(&config);
    if args.require_registered {
        registered_callbacks_or_error(&handle)?;
    }

    // --- Records ---
    let customers = read_customers(args.input.as_deref())?;
    tracing::info!(count = customers.len(), "Loaded customers");

    let mut rejected = 0usize;
    for (index, customer) in customers.iter().enumerate() {
        let result = if args.update {
            handle.update(customer)
        } else {
            handle.create(customer)
        };
        match result {
            Ok(()) => println!("#{index}: ok"),
            Err(err) => {
                rejected += 1;
                println!("#{index}: rejected");
                for line in report(&err) {
                    println!("  {line}");
                }
            }
        }
    }

    tracing::info!(
        committed = handle.journal().len(),
        rejected,
        "Finished"
    );
    Ok(if rejected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read_customers(path: Option<&Path>) -> anyhow::Result<Vec<Customer>> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("parsing customers")
}

/// One line per failure as `<label>: <message>`, grouped by label, followed
/// by any errors that are not validation failures.
fn report(err: &WriteError) -> Vec<String> {
    let mut by_label: BTreeMap<String, Vec<ValidationFailure>> = BTreeMap::new();
    for failure in err.failures() {
        by_label.entry(failure.label()).or_default().push(failure);
    }

    let mut lines = Vec::new();
    for (label, failures) in &by_label {
        for failure in failures {
            lines.push(format!("{label}: {}", failure.message()));
        }
    }
    lines.extend(
        err.errors()
            .iter()
            .filter(|e| !validations_core::is_error(&***e))
            .map(|e| e.to_string()),
    );
    lines
}
