//! English-only rewrite of markdown and raw cells
//!
//! A cell where at least half the lines (rounded up, minimum one) contain
//! Persian script is replaced wholesale by [`PLACEHOLDER`]. Below
//! that threshold only the Persian lines go: the first one becomes
//! [`REDACTION_MARKER`] and the rest are dropped.

use crate::header::{ensure_header_cell, BadgeConfig};
use crate::notebook::{Cell, CellType, Notebook};
use crate::script::{count_persian_lines, has_persian};
use serde::Serialize;
use std::path::PathBuf;

/// Source of a cell that was mostly non-English
pub const PLACEHOLDER: &str = "This section has been converted to English-only content. Please refer to the README for full instructions and workflow.\n";

/// Line left where non-English lines were removed
pub const REDACTION_MARKER: &str = "[Text removed: non-English content]\n";

/// What the pass did to one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellOutcome {
    /// Not touched (code cell, empty, or all English)
    Unchanged,
    /// Non-English lines collapsed into one marker
    Redacted {
        /// Number of non-English lines taken out
        removed_lines: usize,
    },
    /// Whole source replaced by the placeholder
    Replaced,
}

/// Summary of one localization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizeReport {
    /// Notebook file, when run through [`crate::localize_file`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub header_inserted: bool,
    pub cells_total: usize,
    pub cells_replaced: usize,
    pub cells_redacted: usize,
    pub lines_removed: usize,
    pub code_cells_skipped: usize,
    /// Whether the file was written (false for dry runs)
    pub written: bool,
}

impl LocalizeReport {
    /// Whether the run changed anything in the document
    pub const fn changed(&self) -> bool {
        self.header_inserted || self.cells_replaced > 0 || self.cells_redacted > 0
    }

    fn record(&mut self, outcome: CellOutcome) {
        match outcome {
            CellOutcome::Unchanged => {}
            CellOutcome::Redacted { removed_lines } => {
                self.cells_redacted += 1;
                self.lines_removed += removed_lines;
            }
            CellOutcome::Replaced => self.cells_replaced += 1,
        }
    }
}

/// Minimum number of non-English lines that triggers full replacement
///
/// Half the line count rounded up, never below one: one of two lines is
/// enough, one of three is not.
#[inline]
pub fn replacement_threshold(line_count: usize) -> usize {
    line_count.div_ceil(2).max(1)
}

/// Rewrite lines so that no Persian text remains
///
/// Returns `None` when the lines contain no Persian text.
pub fn localize_lines(lines: &[String]) -> Option<(Vec<String>, CellOutcome)> {
    let persian = count_persian_lines(lines);
    if persian == 0 {
        return None;
    }

    if persian >= replacement_threshold(lines.len()) {
        return Some((vec![PLACEHOLDER.to_string()], CellOutcome::Replaced));
    }

    let mut kept = Vec::with_capacity(lines.len() - persian + 1);
    let mut marked = false;
    for line in lines {
        if !has_persian(line) {
            kept.push(line.clone());
        } else if !marked {
            kept.push(REDACTION_MARKER.to_string());
            marked = true;
        }
    }

    Some((
        kept,
        CellOutcome::Redacted {
            removed_lines: persian,
        },
    ))
}

/// Localize a single cell in place
///
/// Code cells are never inspected.
pub fn localize_cell(cell: &mut Cell) -> CellOutcome {
    let Some(source) = cell.source_mut() else {
        return CellOutcome::Unchanged;
    };

    match localize_lines(source.lines()) {
        Some((lines, outcome)) => {
            source.set_lines(lines);
            outcome
        }
        None => CellOutcome::Unchanged,
    }
}

/// Run the full in-memory pass: header cell, then every cell
pub fn localize(mut notebook: Notebook, badges: &BadgeConfig) -> (Notebook, LocalizeReport) {
    let mut report = LocalizeReport {
        header_inserted: ensure_header_cell(&mut notebook, badges),
        cells_total: notebook.cells.len(),
        ..Default::default()
    };

    for (index, cell) in notebook.cells.iter_mut().enumerate() {
        if cell.cell_type() == CellType::Code {
            report.code_cells_skipped += 1;
            continue;
        }
        let outcome = localize_cell(cell);
        if outcome != CellOutcome::Unchanged {
            tracing::debug!(index, cell_type = %cell.cell_type(), ?outcome, "Localized cell");
        }
        report.record(outcome);
    }

    tracing::info!(
        header_inserted = report.header_inserted,
        replaced = report.cells_replaced,
        redacted = report.cells_redacted,
        "Localization pass complete"
    );

    (notebook, report)
}
