//! Check command - report requirement state without installing

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::Config;
use crate::error::RequisiteResult;
use crate::requirements::{create_coordinator, Requirement};
use crate::ui::{self, TaskSpinner, UiContext};
use console::style;
use futures_util::future::join_all;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CheckResult {
    requirement: String,
    satisfied: bool,
}

/// Execute the check command
pub async fn execute(args: CheckArgs, config: &Config) -> RequisiteResult<()> {
    let requirements = args
        .requirements
        .iter()
        .map(Requirement::new)
        .collect::<RequisiteResult<Vec<_>>>()?;

    let coordinator = create_coordinator(config);
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    let table = args.format == OutputFormat::Table;
    if table {
        ui::intro(&ctx, "Requirements");
        spinner.start(&format!("Checking {} requirement(s)...", requirements.len()));
    }
    let satisfied = join_all(requirements.iter().map(|req| coordinator.is_satisfied(req))).await;
    if table {
        let missing = satisfied.iter().filter(|s| !**s).count();
        if missing == 0 {
            spinner.stop("All requirements satisfied");
        } else {
            spinner.stop_error(&format!("{} requirement(s) missing", missing));
        }
    }

    let results: Vec<CheckResult> = requirements
        .iter()
        .zip(satisfied)
        .map(|(req, satisfied)| CheckResult {
            requirement: req.to_string(),
            satisfied,
        })
        .collect();

    match args.format {
        OutputFormat::Table => print_table(&results),
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Plain => print_plain(&results),
    }

    Ok(())
}

fn print_table(results: &[CheckResult]) {
    println!();
    println!(
        "{:<40} {:<10}",
        style("REQUIREMENT").bold(),
        style("STATUS").bold()
    );
    println!("{}", "-".repeat(51));

    for result in results {
        let status = if result.satisfied {
            style("satisfied").green()
        } else {
            style("missing").yellow()
        };
        println!("{:<40} {:<10}", result.requirement, status);
    }

    println!();
    println!("{} requirement(s)", results.len());
}

fn print_json(results: &[CheckResult]) -> RequisiteResult<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(results: &[CheckResult]) {
    for result in results {
        let status = if result.satisfied { "satisfied" } else { "missing" };
        println!("{}\t{}", result.requirement, status);
    }
}
