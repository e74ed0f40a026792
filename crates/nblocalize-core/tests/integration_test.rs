//! Integration tests for nblocalize-core
//!
//! These tests run the file-level pass against notebooks in a temporary
//! directory:
//! - Header insertion and cell rewriting end to end
//! - Pass-through of fields the pass does not own
//! - Failure modes leave the file untouched

use nblocalize_core::{
    localize_file, BadgeConfig, LocalizeError, LocalizeOptions, BADGE_MARKER, PLACEHOLDER,
    REDACTION_MARKER,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_notebook(dir: &Path, value: &Value) -> PathBuf {
    let path = dir.join("notebook.ipynb");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn sample_notebook() -> Value {
    json!({
        "cells": [
            {
                "cell_type": "markdown",
                "id": "c1",
                "metadata": {},
                "source": ["مقدمه\n"]
            },
            {
                "cell_type": "code",
                "execution_count": null,
                "id": "c2",
                "metadata": {"collapsed": false},
                "outputs": [],
                "source": ["print(1)"]
            },
            {
                "cell_type": "markdown",
                "id": "c3",
                "metadata": {},
                "source": ["## Setup\n", "Install the package.\n", "نصب\n", "Then run it.\n"]
            },
            {
                "cell_type": "raw",
                "id": "c4",
                "metadata": {},
                "source": []
            }
        ],
        "metadata": {
            "kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    })
}

#[test]
fn test_end_to_end_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        dir.path(),
        &json!({
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": ["مقدمه\n"]},
                {"cell_type": "code", "metadata": {}, "source": ["print(1)"]}
            ]
        }),
    );

    let report = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();
    assert!(report.header_inserted);
    assert!(report.written);
    assert_eq!(report.path.as_deref(), Some(path.as_path()));

    let output = read_json(&path);
    let cells = output["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 3);

    assert_eq!(cells[0]["cell_type"], "markdown");
    assert_eq!(cells[0]["metadata"], json!({}));
    assert_eq!(
        cells[0]["source"],
        json!([BadgeConfig::default().header_markdown()])
    );

    assert_eq!(cells[1]["cell_type"], "markdown");
    assert_eq!(cells[1]["source"], json!([PLACEHOLDER]));

    assert_eq!(
        cells[2],
        json!({"cell_type": "code", "metadata": {}, "source": ["print(1)"]})
    );
}

#[test]
fn test_full_notebook() {
    let dir = TempDir::new().unwrap();
    let input = sample_notebook();
    let path = write_notebook(dir.path(), &input);

    let report = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();
    assert_eq!(report.cells_total, 5);
    assert_eq!(report.cells_replaced, 1);
    assert_eq!(report.cells_redacted, 1);
    assert_eq!(report.lines_removed, 1);
    assert_eq!(report.code_cells_skipped, 1);

    let output = read_json(&path);
    let cells = output["cells"].as_array().unwrap();

    // nbformat 4.5 requires ids, so the header gets one
    assert_eq!(cells[0]["id"], "badge-header");
    assert!(cells[0]["source"][0].as_str().unwrap().contains(BADGE_MARKER));

    assert_eq!(cells[1]["id"], "c1");
    assert_eq!(cells[1]["source"], json!([PLACEHOLDER]));

    assert_eq!(cells[2], input["cells"][1]);

    assert_eq!(
        cells[3]["source"],
        json!(["## Setup\n", "Install the package.\n", REDACTION_MARKER, "Then run it.\n"])
    );
    assert_eq!(cells[4]["source"], json!([]));

    assert_eq!(output["metadata"], input["metadata"]);
    assert_eq!(output["nbformat"], 4);
    assert_eq!(output["nbformat_minor"], 5);
}

#[test]
fn test_cell_types_preserved() {
    let dir = TempDir::new().unwrap();
    let input = sample_notebook();
    let path = write_notebook(dir.path(), &input);

    localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();

    let output = read_json(&path);
    let types: Vec<_> = output["cells"]
        .as_array()
        .unwrap()
        .iter()
        .map(|cell| cell["cell_type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, ["markdown", "markdown", "code", "markdown", "raw"]);
}

#[test]
fn test_second_run_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(dir.path(), &sample_notebook());

    localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let report = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();
    let second = fs::read_to_string(&path).unwrap();

    assert!(!report.changed());
    assert_eq!(first, second);
}

#[test]
fn test_output_format() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(dir.path(), &sample_notebook());

    localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();
    let written = fs::read_to_string(&path).unwrap();

    assert!(written.starts_with("{\n  \"cells\": [\n    {\n      \"cell_type\""));
    assert!(written.ends_with("}\n"));

    let keys: Vec<_> = serde_json::from_str::<serde_json::Map<String, Value>>(&written)
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, ["cells", "metadata", "nbformat", "nbformat_minor"]);
}

#[test]
fn test_non_ascii_written_literally() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        dir.path(),
        &json!({
            "cells": [],
            "metadata": {"title": "تحلیل داده"}
        }),
    );

    localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"title\": \"تحلیل داده\""));
}

#[test]
fn test_dry_run_leaves_file() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(dir.path(), &sample_notebook());
    let before = fs::read_to_string(&path).unwrap();

    let report = localize_file(
        &path,
        &BadgeConfig::default(),
        LocalizeOptions { dry_run: true },
    )
    .unwrap();

    assert!(report.changed());
    assert!(!report.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_missing_notebook() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.ipynb");

    let err = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap_err();
    assert!(matches!(err, LocalizeError::NotFound { .. }));
    assert!(err.to_string().contains("missing.ipynb"));
    assert!(!path.exists());
}

#[test]
fn test_malformed_notebook_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ipynb");
    fs::write(&path, "{\"cells\": [ not json").unwrap();

    let err = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap_err();
    assert!(matches!(err, LocalizeError::MalformedDocument(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"cells\": [ not json");
}

#[test]
fn test_invalid_utf8_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.ipynb");
    let bytes = b"{\"cells\":[{\"cell_type\":\"markdown\",\"source\":[\"\xff\xfe\"]}]}".to_vec();
    fs::write(&path, &bytes).unwrap();

    let err = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap_err();
    assert!(matches!(err, LocalizeError::MalformedDocument(_)));
    assert_eq!(fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_invalid_structure_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        dir.path(),
        &json!({"cells": [{"cell_type": "markdown", "source": {"not": "lines"}}]}),
    );
    let before = fs::read_to_string(&path).unwrap();

    let err = localize_file(&path, &BadgeConfig::default(), LocalizeOptions::default()).unwrap_err();
    assert!(matches!(err, LocalizeError::MalformedDocument(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_custom_badges() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(dir.path(), &json!({"cells": []}));
    let badges = BadgeConfig {
        owner: "octo".to_string(),
        repo: "tour".to_string(),
        notebook: "tour.ipynb".to_string(),
    };

    localize_file(&path, &badges, LocalizeOptions::default()).unwrap();

    let output = read_json(&path);
    let header = output["cells"][0]["source"][0].as_str().unwrap();
    assert!(header.contains("https://colab.research.google.com/github/octo/tour/blob/main/tour.ipynb"));
    assert!(header.contains("https://raw.githubusercontent.com/octo/tour/main/tour.ipynb"));
}
