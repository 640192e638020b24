//! Year command - show the inferred statement year

use std::path::PathBuf;

use anyhow::Result;
use cartola_core::YearSource;

use crate::output;

use super::{get_context, resolve_password};

pub fn run(pdf: PathBuf, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password)?;
    let year = ctx.statement_service.infer_year(&pdf, &password)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&year)?);
        return Ok(());
    }

    let source = match (year.source, year.page) {
        (YearSource::DatedPattern, Some(page)) => format!("from a dated line on page {}", page),
        (YearSource::PeriodMarker, Some(page)) => {
            format!("from the statement period on page {}", page)
        }
        _ => "fallback, no date found".to_string(),
    };
    println!("{} ({})", year, source);
    if year.is_fallback() {
        output::warning("Set fallbackYear in settings.json or CARTOLA_FALLBACK_YEAR to change it");
    }
    Ok(())
}
