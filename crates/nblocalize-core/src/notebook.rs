use crate::error::{LocalizeError, Result};
use crate::source::{json_kind, CellSource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Jupyter notebook document
///
/// Only `cells` is decoded; every other top-level field is carried through
/// untouched and keeps its position in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Notebook {
    /// Cells in document order
    pub cells: Vec<Cell>,
    fields: Map<String, Value>,
}

/// Individual notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Cell {
    cell_type: CellType,
    /// Decoded for markdown and raw cells only. Code cell sources stay in
    /// `fields` as read.
    source: Option<CellSource>,
    fields: Map<String, Value>,
}

/// Type of notebook cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Executable code cell
    #[default]
    Code,
    /// Markdown documentation cell
    Markdown,
    /// Raw text cell (no formatting)
    Raw,
}

impl CellType {
    /// Wire name used in the `cell_type` field
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        }
    }

    /// Whether the localization pass rewrites cells of this type
    #[inline]
    pub const fn is_prose(self) -> bool {
        matches!(self, Self::Markdown | Self::Raw)
    }
}

impl std::fmt::Display for CellType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "markdown" => Ok(Self::Markdown),
            "raw" => Ok(Self::Raw),
            _ => Err(format!(
                "Unknown cell type '{s}'. Expected: code, markdown, raw"
            )),
        }
    }
}

impl Cell {
    /// Create a markdown cell with empty metadata
    ///
    /// The `id` field is only written when one is given.
    pub fn markdown<I, S>(id: Option<&str>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = Map::new();
        fields.insert(
            "cell_type".to_string(),
            Value::String(CellType::Markdown.as_str().to_string()),
        );
        if let Some(id) = id {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }
        fields.insert("metadata".to_string(), Value::Object(Map::new()));
        fields.insert("source".to_string(), Value::Null);

        Self {
            cell_type: CellType::Markdown,
            source: Some(CellSource::from_lines(lines)),
            fields,
        }
    }

    #[inline]
    pub const fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Decoded source of a markdown or raw cell, `None` for code cells
    #[inline]
    pub const fn source(&self) -> Option<&CellSource> {
        self.source.as_ref()
    }

    #[inline]
    pub fn source_mut(&mut self) -> Option<&mut CellSource> {
        self.source.as_mut()
    }

    /// Concatenated source text of a markdown or raw cell
    pub fn source_text(&self) -> Option<String> {
        self.source.as_ref().map(CellSource::text)
    }

    /// Cell metadata, passed through as read
    pub fn metadata(&self) -> Option<&Value> {
        self.fields.get("metadata")
    }

    /// Any other field of the cell (`id`, `outputs`, ...)
    ///
    /// For code cells this includes the raw `source` value.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl TryFrom<Map<String, Value>> for Cell {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let cell_type = match fields.get("cell_type") {
            Some(Value::String(name)) => name.parse::<CellType>()?,
            Some(other) => {
                return Err(format!(
                    "cell_type must be a string, found {}",
                    json_kind(other)
                ))
            }
            None => return Err("cell is missing cell_type".to_string()),
        };

        // Taking the value leaves a null in place so the key keeps its slot
        let source = if cell_type.is_prose() {
            Some(CellSource::from_value(
                fields.get_mut("source").map(Value::take),
            )?)
        } else {
            None
        };

        Ok(Self {
            cell_type,
            source,
            fields,
        })
    }
}

impl From<Cell> for Map<String, Value> {
    fn from(cell: Cell) -> Self {
        let mut fields = cell.fields;
        if let Some(value) = cell.source.as_ref().and_then(CellSource::to_value) {
            fields.insert("source".to_string(), value);
        }
        fields
    }
}

impl Notebook {
    /// Create a notebook from cells, with no other fields
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            fields: Map::new(),
        }
    }

    /// Declared `(nbformat, nbformat_minor)`, if both are present
    pub fn nbformat(&self) -> Option<(u64, u64)> {
        let major = self.fields.get("nbformat")?.as_u64()?;
        let minor = self.fields.get("nbformat_minor")?.as_u64()?;
        Some((major, minor))
    }

    /// Whether the declared format requires every cell to carry an `id`
    pub fn requires_cell_ids(&self) -> bool {
        matches!(self.nbformat(), Some((major, minor)) if major > 4 || (major == 4 && minor >= 5))
    }

    /// Any top-level field other than `cells`
    pub fn field(&self, key: &str) -> Option<&Value> {
        if key == "cells" {
            return None;
        }
        self.fields.get(key)
    }
}

impl TryFrom<Map<String, Value>> for Notebook {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let cells = match fields.get_mut("cells").map(Value::take) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Cell::try_from(map).map_err(|e| format!("cell {i}: {e}")),
                    other => Err(format!(
                        "cell {i} must be an object, found {}",
                        json_kind(&other)
                    )),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(format!(
                    "cells must be an array, found {}",
                    json_kind(&other)
                ))
            }
        };

        Ok(Self { cells, fields })
    }
}

impl From<Notebook> for Map<String, Value> {
    fn from(notebook: Notebook) -> Self {
        let mut fields = notebook.fields;
        let cells = notebook
            .cells
            .into_iter()
            .map(|cell| Value::Object(cell.into()))
            .collect();
        fields.insert("cells".to_string(), Value::Array(cells));
        fields
    }
}

/// Load a Jupyter Notebook from a file path
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist ([`LocalizeError::NotFound`])
/// - The file cannot be read (I/O error)
/// - The content is not a notebook document
pub fn load_notebook<P: AsRef<Path>>(path: P) -> Result<Notebook> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LocalizeError::NotFound {
            path: path.to_path_buf(),
        });
    }

    // Bytes go straight to serde_json so invalid UTF-8 is a decode error
    let content = fs::read(path)?;
    let notebook: Notebook = serde_json::from_slice(&content)?;
    tracing::debug!(path = %path.display(), cells = notebook.cells.len(), "Loaded notebook");
    Ok(notebook)
}

/// Parse a Jupyter Notebook from a string
///
/// # Errors
///
/// Returns an error if the JSON is malformed or is not a notebook document.
pub fn parse_notebook_from_str(content: &str) -> Result<Notebook> {
    Ok(serde_json::from_str(content)?)
}

/// Serialize a notebook the way it is written to disk
///
/// Two-space indentation, non-ASCII text kept literal, original key order,
/// trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn notebook_to_string(notebook: &Notebook) -> Result<String> {
    let mut content = serde_json::to_string_pretty(notebook)?;
    content.push('\n');
    Ok(content)
}

/// Write a notebook to a file path, replacing any existing file
///
/// The document is fully serialized before the file is opened.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_notebook<P: AsRef<Path>>(notebook: &Notebook, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = notebook_to_string(notebook)?;
    fs::write(path, content)?;
    tracing::info!(path = %path.display(), "Wrote notebook");
    Ok(())
}
