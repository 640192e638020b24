//! Statement year inference
//!
//! Table rows print only day and month, so the year comes from elsewhere in
//! the page text: a full `DD/MMM/YYYY` date first, then the statement period
//! markers `DESDE` / `HASTA`.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{StatementYear, YearSource, FALLBACK_YEAR};

fn dated_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d{1,2}\s*/\s*[A-Z]{3}\s*/\s*(\d{4})").expect("valid dated pattern")
    })
}

fn period_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"DESDE.*?(\d{4})|HASTA.*?(\d{4})").expect("valid period pattern")
    })
}

/// Finds the year a statement belongs to
#[derive(Debug, Clone)]
pub struct YearInferencer {
    fallback_year: i32,
}

impl Default for YearInferencer {
    fn default() -> Self {
        Self::new(FALLBACK_YEAR)
    }
}

impl YearInferencer {
    pub fn new(fallback_year: i32) -> Self {
        Self { fallback_year }
    }

    pub fn fallback_year(&self) -> i32 {
        self.fallback_year
    }

    /// Infer the year from page texts given in page order
    ///
    /// Pages without text are skipped. The first page with a match decides;
    /// within a page a full date wins over a period marker.
    pub fn infer<'a, I>(&self, pages: I) -> StatementYear
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        for (index, text) in pages.into_iter().enumerate() {
            let Some(text) = text else { continue };
            if let Some(found) = Self::infer_page(text, index + 1) {
                debug!(
                    year = found.year,
                    source = ?found.source,
                    page = index + 1,
                    "statement year found"
                );
                return found;
            }
        }

        debug!(year = self.fallback_year, "no year in statement text, using fallback");
        StatementYear::fallback(self.fallback_year)
    }

    fn infer_page(text: &str, page: usize) -> Option<StatementYear> {
        if let Some(year) = dated_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
        {
            return Some(StatementYear::found(year, YearSource::DatedPattern, page));
        }

        period_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .and_then(|m| m.as_str().parse().ok())
            .map(|year| StatementYear::found(year, YearSource::PeriodMarker, page))
    }
}
