//! Convert command - statement PDF to spreadsheet

use std::path::PathBuf;

use anyhow::Result;
use cartola_core::ports::ExportFormat;
use cartola_core::OperationResult;

use crate::output;

use super::{default_output, get_context, resolve_password};

pub fn run(
    pdf: PathBuf,
    password: Option<String>,
    output_path: Option<PathBuf>,
    format: Option<ExportFormat>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password)?;

    let format = format.unwrap_or(ctx.config.default_format);
    let output_path = output_path.unwrap_or_else(|| default_output(&pdf, format));
    let exporter = ctx.exporter_for(format);

    let result = ctx
        .statement_service
        .convert(&pdf, &password, exporter.as_ref(), &output_path);

    if json {
        let failure = result.as_ref().err().map(|e| e.to_string());
        println!("{}", serde_json::to_string_pretty(&OperationResult::from(result))?);
        return match failure {
            Some(msg) => Err(anyhow::anyhow!(msg)),
            None => Ok(()),
        };
    }

    let converted = result?;
    output::success(&format!(
        "Wrote {} transactions to {}",
        converted.records,
        converted.output.display()
    ));
    println!(
        "Year {} | {} income, {} expense, {} without movement | net {}",
        converted.year,
        converted.summary.income,
        converted.summary.expense,
        converted.summary.no_movement,
        output::money(converted.net_total)
    );
    if converted.year.is_fallback() {
        output::warning(&format!(
            "No date found in the statement; assumed year {}",
            converted.year
        ));
    }
    if converted.skipped > 0 {
        output::warning(&format!(
            "{} rows could not be read; run `cartola preview` to see them",
            converted.skipped
        ));
    }
    Ok(())
}
