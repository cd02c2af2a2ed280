//! Terminal summary of an [`ObservationReport`].
//!
//! [`ReportSummary`] borrows the report and renders, through `comfy-table`, the simple
//! table (one row per observable object) followed by the list of failed objects when
//! there is one. Nothing is cloned until the table is built at formatting time.
//!
//! ```rust,ignore
//! println!("{}", report.summary());
//! println!("{}", report.summary().with_limit(20));
//! ```
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use super::{ObservationReport, SIMPLE_HEADER};

/// Display adaptor over a borrowed report.
pub struct ReportSummary<'a> {
    report: &'a ObservationReport,
    /// Maximum number of simple-table rows printed, `None` for all of them.
    limit: Option<usize>,
}

impl<'a> ReportSummary<'a> {
    pub fn new(report: &'a ObservationReport) -> Self {
        ReportSummary {
            report,
            limit: None,
        }
    }

    /// Print at most `limit` rows of the simple table.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn simple_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(SIMPLE_HEADER.iter().map(Cell::new).collect::<Vec<_>>());

        let limit = self.limit.unwrap_or(usize::MAX);
        for row in self.report.simple().iter().take(limit) {
            table.add_row(vec![
                Cell::new(&row.satellite),
                Cell::new(&row.date),
                Cell::new(&row.time),
                Cell::new(&row.ra),
                Cell::new(&row.dec),
            ]);
        }
        table
    }
}

impl fmt::Display for ReportSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self
            .limit
            .map_or(self.report.simple().len(), |l| l.min(self.report.simple().len()));
        writeln!(
            f,
            "{} observable object(s), {} sample(s)",
            self.report.simple().len(),
            self.report.detailed().len()
        )?;
        writeln!(f, "{}", self.simple_table())?;
        if shown < self.report.simple().len() {
            writeln!(f, "… {} more", self.report.simple().len() - shown)?;
        }

        if !self.report.failed().is_empty() {
            let mut failed = Table::new();
            failed
                .load_preset(UTF8_FULL)
                .set_header(vec![Cell::new("failed satellite")]);
            for object in self.report.failed() {
                failed.add_row(vec![Cell::new(object)]);
            }
            writeln!(f, "{failed}")?;
        }
        Ok(())
    }
}

impl ObservationReport {
    /// Terminal summary adaptor, see [`ReportSummary`].
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary::new(self)
    }
}
