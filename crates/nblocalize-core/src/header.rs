//! Badge header cell
//!
//! The header is a markdown cell at the top of the notebook with a title,
//! "Open In Colab" / "Open in Kaggle" badges and a note about the API key
//! the notebook expects.

use crate::notebook::{Cell, CellType, Notebook};
use serde_json::Value;
use std::collections::HashSet;

/// Default repository owner used in badge URLs
pub const DEFAULT_OWNER: &str = "aminhaghii";

/// Default repository name used in badge URLs
pub const DEFAULT_REPO: &str = "zero_shot_object_detection_and_segmentation_with_google_gamini_2_5";

/// Default notebook filename, relative to the repository root
pub const DEFAULT_NOTEBOOK: &str =
    "zero_shot_object_detection_and_segmentation_with_google_gamini_2_5.ipynb";

/// Substring that identifies an existing header cell
pub const BADGE_MARKER: &str = "Open In Colab";

/// Cell id given to the header in notebooks that require ids (nbformat >= 4.5)
pub const HEADER_CELL_ID: &str = "badge-header";

const TITLE: &str = "ZeroShot Object Detection & Segmentation with Google Gemini";
const COLAB_BADGE: &str = "https://colab.research.google.com/assets/colab-badge.svg";
const KAGGLE_BADGE: &str =
    "https://img.shields.io/badge/Open%20in-Kaggle-20BEFF?logo=kaggle&logoColor=white";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Repository coordinates the badge links point at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BadgeConfig {
    /// GitHub user or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Notebook path inside the repository
    pub notebook: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            notebook: DEFAULT_NOTEBOOK.to_string(),
        }
    }
}

impl BadgeConfig {
    pub fn colab_url(&self) -> String {
        format!(
            "https://colab.research.google.com/github/{}/{}/blob/main/{}",
            self.owner, self.repo, self.notebook
        )
    }

    pub fn kaggle_url(&self) -> String {
        format!(
            "https://kaggle.com/kernels/welcome?src=https://raw.githubusercontent.com/{}/{}/main/{}",
            self.owner, self.repo, self.notebook
        )
    }

    /// Full markdown text of the header cell
    pub fn header_markdown(&self) -> String {
        format!(
            "# {TITLE}\n\n\
             [![Open In Colab]({COLAB_BADGE})]({colab})\n\
             [![Open in Kaggle]({KAGGLE_BADGE})]({kaggle})\n\n\
             Note: This notebook is English-only. Set your {API_KEY_ENV} as an environment variable before running.\n",
            colab = self.colab_url(),
            kaggle = self.kaggle_url(),
        )
    }
}

/// Whether the notebook already starts with a badge header
pub fn has_header_cell(notebook: &Notebook) -> bool {
    notebook.cells.first().is_some_and(|cell| {
        cell.cell_type() == CellType::Markdown
            && cell
                .source_text()
                .is_some_and(|text| text.contains(BADGE_MARKER))
    })
}

/// Insert the badge header as the first cell unless it is already there
///
/// Returns `true` if a cell was inserted.
pub fn ensure_header_cell(notebook: &mut Notebook, badges: &BadgeConfig) -> bool {
    if has_header_cell(notebook) {
        tracing::debug!("Badge header already present");
        return false;
    }

    let id = if notebook.requires_cell_ids() {
        Some(unused_header_id(notebook))
    } else {
        None
    };
    notebook
        .cells
        .insert(0, Cell::markdown(id.as_deref(), [badges.header_markdown()]));
    tracing::debug!(colab = %badges.colab_url(), "Inserted badge header");
    true
}

/// [`HEADER_CELL_ID`], or `badge-header-N` if a cell already uses it
fn unused_header_id(notebook: &Notebook) -> String {
    let taken: HashSet<&str> = notebook
        .cells
        .iter()
        .filter_map(|cell| cell.field("id").and_then(Value::as_str))
        .collect();

    if !taken.contains(HEADER_CELL_ID) {
        return HEADER_CELL_ID.to_string();
    }
    (2..)
        .map(|n| format!("{HEADER_CELL_ID}-{n}"))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_default()
}
