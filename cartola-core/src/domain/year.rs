//! Statement year context

use std::fmt;

use serde::Serialize;

/// Year used when no page carries a recognizable date or period marker
pub const FALLBACK_YEAR: i32 = 2025;

/// Where the statement year was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSource {
    /// A full `DD/MMM/YYYY` date in the page text
    DatedPattern,
    /// A `DESDE ... YYYY` or `HASTA ... YYYY` period marker
    PeriodMarker,
    /// Nothing matched; the configured fallback was used
    Fallback,
}

/// The single year shared by every row of one statement
///
/// Table rows only carry day and month, so this is inferred once per
/// document and applied to all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementYear {
    pub year: i32,
    pub source: YearSource,
    /// 1-based page the year was read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl StatementYear {
    pub fn found(year: i32, source: YearSource, page: usize) -> Self {
        Self {
            year,
            source,
            page: Some(page),
        }
    }

    pub fn fallback(year: i32) -> Self {
        Self {
            year,
            source: YearSource::Fallback,
            page: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == YearSource::Fallback
    }
}

impl fmt::Display for StatementYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)
    }
}
