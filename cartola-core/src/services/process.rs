//! Statement processing: pages in, ordered records out

use tracing::{debug, info, info_span, warn};

use crate::config::Config;
use crate::domain::result::Result;
use crate::domain::{PageSummary, ProcessReport, SkippedRow, StatementYear, StrategyKind};
use crate::ports::StatementDocument;

use super::assemble::assemble;
use super::extract::PageStrategy;
use super::normalize::normalize_row;
use super::year::YearInferencer;

/// Turns a readable statement into a [`ProcessReport`]
///
/// Holds no per-document state; one processor can be reused for any number
/// of statements.
#[derive(Debug, Clone, Default)]
pub struct StatementProcessor {
    inferencer: YearInferencer,
}

impl StatementProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            inferencer: YearInferencer::new(config.fallback_year),
        }
    }

    pub fn with_fallback_year(fallback_year: i32) -> Self {
        Self {
            inferencer: YearInferencer::new(fallback_year),
        }
    }

    /// Infer the statement year without extracting any rows
    pub fn infer_year(&self, document: &dyn StatementDocument) -> Result<StatementYear> {
        let texts = page_texts(document)?;
        Ok(self.inferencer.infer(texts.iter().map(|t| t.as_deref())))
    }

    /// Extract, normalize and assemble every transaction in `document`
    ///
    /// Fails with [`crate::Error::NoTransactions`] when no row survives.
    pub fn process(&self, document: &dyn StatementDocument) -> Result<ProcessReport> {
        let page_count = document.page_count();
        let span = info_span!("process_statement", pages = page_count);
        let _guard = span.enter();

        let texts = page_texts(document)?;

        let year = self.inferencer.infer(texts.iter().map(|t| t.as_deref()));

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut pages = Vec::with_capacity(page_count);

        for (index, text) in texts.iter().enumerate() {
            let page = index + 1;
            let tables = document.page_tables(index)?;
            let strategy = PageStrategy::for_page(text.as_deref(), &tables);
            let extracted = strategy.extract(page);

            let mut page_skipped = extracted.skipped;
            let mut accepted = 0;
            for row in &extracted.rows {
                match normalize_row(row, &year) {
                    Ok(record) => {
                        records.push(record);
                        accepted += 1;
                    }
                    Err(reason) => {
                        let content = format!(
                            "{} {} {}",
                            row.date_text(&year),
                            row.description,
                            row.document_id
                        );
                        warn!(page, %reason, %content, "skipping statement row");
                        page_skipped.push(SkippedRow {
                            page,
                            strategy: row.source,
                            content,
                            reason,
                        });
                    }
                }
            }

            debug!(
                page,
                strategy = ?strategy.kind(),
                tables = tables.len(),
                accepted,
                skipped = page_skipped.len(),
                "page processed"
            );
            pages.push(PageSummary {
                page,
                strategy: strategy.kind(),
                accepted,
                skipped: page_skipped.len(),
            });
            skipped.append(&mut page_skipped);
        }

        let extracted = records.len();
        let document = assemble(records).inspect_err(|_| {
            warn!(skipped = skipped.len(), "no transactions found in statement");
        })?;

        info!(
            year = year.year,
            extracted,
            kept = document.len(),
            skipped = skipped.len(),
            text_pages = pages.iter().filter(|p| p.strategy == StrategyKind::Text).count(),
            "statement processed"
        );

        Ok(ProcessReport {
            year,
            pages,
            skipped,
            document,
        })
    }
}

fn page_texts(document: &dyn StatementDocument) -> Result<Vec<Option<String>>> {
    (0..document.page_count())
        .map(|index| document.page_text(index))
        .collect()
}
