//! # nblocalize-core
//!
//! English-only rewrite of Jupyter notebooks (.ipynb).
//!
//! A run does three things to a notebook:
//! - Inserts a markdown header cell with "Open In Colab" / "Open in Kaggle"
//!   badges, unless the notebook already starts with one
//! - Replaces markdown and raw cells that are mostly Persian with a short
//!   English placeholder
//! - Removes the Persian lines from the remaining markdown and raw cells,
//!   leaving a single marker where they were
//!
//! Code cells are never modified. All fields the pass does not touch are
//! written back as read, in their original order.
//!
//! ## Example
//!
//! ```no_run
//! use nblocalize_core::{localize_file, BadgeConfig, LocalizeOptions};
//!
//! let report = localize_file("analysis.ipynb", &BadgeConfig::default(), LocalizeOptions::default())?;
//! println!("replaced {} cells", report.cells_replaced);
//! # Ok::<(), nblocalize_core::LocalizeError>(())
//! ```

/// Error types for notebook localization
pub mod error;
/// Badge header cell
pub mod header;
/// Cell rewriting
pub mod localize;
/// Notebook document model, load and save
pub mod notebook;
/// Persian script detection
pub mod script;
/// Cell source normalization
pub mod source;

use std::path::Path;

pub use error::{LocalizeError, Result};
pub use header::{
    ensure_header_cell, has_header_cell, BadgeConfig, BADGE_MARKER, DEFAULT_NOTEBOOK,
    DEFAULT_OWNER, DEFAULT_REPO,
};
pub use localize::{
    localize, localize_cell, localize_lines, replacement_threshold, CellOutcome, LocalizeReport,
    PLACEHOLDER, REDACTION_MARKER,
};
pub use notebook::{
    load_notebook, notebook_to_string, parse_notebook_from_str, save_notebook, Cell, CellType,
    Notebook,
};
pub use script::has_persian;
pub use source::{split_lines_keep_ends, CellSource, SourceShape};

/// Options for [`localize_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LocalizeOptions {
    /// Run the pass and report, but leave the file alone
    pub dry_run: bool,
}

/// Load a notebook, localize it and write it back to the same path
///
/// Nothing is written unless loading and the in-memory pass both succeed.
///
/// # Errors
///
/// Returns an error if:
/// - The notebook does not exist ([`LocalizeError::NotFound`])
/// - The file is not a notebook document ([`LocalizeError::MalformedDocument`])
/// - Reading or writing the file fails
pub fn localize_file<P: AsRef<Path>>(
    path: P,
    badges: &BadgeConfig,
    options: LocalizeOptions,
) -> Result<LocalizeReport> {
    let path = path.as_ref();
    let notebook = load_notebook(path)?;
    let (notebook, mut report) = localize(notebook, badges);
    report.path = Some(path.to_path_buf());

    if options.dry_run {
        tracing::info!(path = %path.display(), "Dry run, notebook not written");
    } else {
        save_notebook(&notebook, path)?;
        report.written = true;
    }

    Ok(report)
}
