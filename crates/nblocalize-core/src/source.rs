//! Cell source normalization
//!
//! Notebook files store a cell's `source` either as one string or as a list
//! of line strings. [`CellSource`] converts both into a single ordered-line
//! form when a cell is decoded and converts back only when it is encoded, so
//! the localization pass never branches on the wire representation.

use serde_json::Value;

/// How a cell's `source` was represented in the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceShape {
    /// List of line strings (the nbformat canonical form)
    #[default]
    Lines,
    /// A single multi-line string
    Text,
    /// No `source` field at all
    Absent,
}

/// Cell source as an ordered list of lines, terminators included
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellSource {
    lines: Vec<String>,
    shape: SourceShape,
}

impl CellSource {
    /// Create a source in list form
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            shape: SourceShape::Lines,
        }
    }

    /// Create a source in single-string form
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines_keep_ends(text),
            shape: SourceShape::Text,
        }
    }

    /// Decode the JSON `source` value of a cell
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the value is neither a string
    /// nor a list of strings.
    pub fn from_value(value: Option<Value>) -> std::result::Result<Self, String> {
        match value {
            None | Some(Value::Null) => Ok(Self {
                lines: Vec::new(),
                shape: SourceShape::Absent,
            }),
            Some(Value::String(text)) => Ok(Self::from_text(&text)),
            Some(Value::Array(items)) => {
                let lines = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::String(line) => Ok(line),
                        other => Err(format!(
                            "source line {i} must be a string, found {}",
                            json_kind(&other)
                        )),
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(Self::from_lines(lines))
            }
            Some(other) => Err(format!(
                "source must be a string or a list of strings, found {}",
                json_kind(&other)
            )),
        }
    }

    /// Encode back to JSON in the shape the source was read in
    ///
    /// Returns `None` for an absent source that is still empty.
    pub fn to_value(&self) -> Option<Value> {
        match self.shape {
            SourceShape::Absent if self.lines.is_empty() => None,
            SourceShape::Text => Some(Value::String(self.text())),
            SourceShape::Lines | SourceShape::Absent => Some(Value::Array(
                self.lines.iter().cloned().map(Value::String).collect(),
            )),
        }
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[inline]
    pub const fn shape(&self) -> SourceShape {
        self.shape
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Concatenated source text
    pub fn text(&self) -> String {
        self.lines.concat()
    }

    /// Replace the lines, keeping the wire shape
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }
}

/// Split text into lines, keeping each line's terminator
///
/// Recognizes `\r\n` as one boundary, plus `\n`, `\r`, vertical tab, form
/// feed, the file/group/record separators, NEL and the Unicode line and
/// paragraph separators. A trailing fragment without a terminator is kept
/// as the last line; empty text yields no lines.
pub fn split_lines_keep_ends(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_boundary(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                end = j + 1;
                chars.next();
            }
        }
        lines.push(text[start..end].to_string());
        start = end;
    }

    if start < text.len() {
        lines.push(text[start..].to_string());
    }

    lines
}

#[inline]
const fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
