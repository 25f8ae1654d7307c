use crate::core::{ColumnInfo, TablePreview};
use crate::utils::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(BrowserError::InvalidConfigValueError {
                field: "browser.format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: table, csv, json".to_string(),
            }),
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        single_line
    } else {
        let mut cut: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

/// Plain-text grid with a header row and `-+-` separators.
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers));
    lines.push(separator);
    for row in rows {
        lines.push(format_row(row));
    }
    lines.join("\n")
}

pub fn render_schema(columns: &[ColumnInfo]) -> String {
    let headers = ["name", "type", "primary_key", "nullable"].map(String::from);
    let rows: Vec<Vec<String>> = columns
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.data_type.clone(),
                c.primary_key.to_string(),
                c.nullable.to_string(),
            ]
        })
        .collect();
    render_grid(&headers, &rows)
}

pub fn render_preview(preview: &TablePreview, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let headers: Vec<String> = preview.columns.iter().map(|c| truncate(c)).collect();
            let rows: Vec<Vec<String>> = preview
                .rows
                .iter()
                .map(|row| row.iter().map(|v| truncate(&cell_text(v))).collect())
                .collect();
            let mut out = render_grid(&headers, &rows);
            out.push_str(&format!("\n({} rows)", preview.row_count()));
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&preview.columns)?;
            for row in &preview.rows {
                // CSV 中 NULL 以空字串表示
                writer.write_record(row.iter().map(|v| match v {
                    Value::Null => String::new(),
                    other => cell_text(other),
                }))?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| BrowserError::IoError(e.into_error()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(preview)?),
    }
}
