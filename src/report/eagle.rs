//! Reader for EAGLE 9.6.2 schematic report exports.
//!
//! Reports are whitespace-aligned column tables (File → Export → Netlist /
//! Partlist / Pinlist). Column spans are detected from the header row;
//! values are allowed to overrun their column up to the next whitespace,
//! which the real exports do for long net names.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{BoardnetError, Result};
use crate::model::{Board, ComponentId, WireId, WireKind};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+\s{3,}){2,}").unwrap());
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"EAGLE Version ([\d.]+)").unwrap());
static EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Exported from ([a-zA-Z0-9.]+)\.(sch|brd) at").unwrap());

/// A column span detected from a report header line.
#[derive(Debug, Clone)]
struct Column {
    start: usize,
    end: usize,
    key: String,
}

/// Split a header line into column spans. A column runs from the start of
/// its header word to just before the start of the next one; the last column
/// runs to the end of the line.
fn header_columns(line: &str) -> Vec<Column> {
    let chars: Vec<char> = line.trim_end().chars().collect();
    let mut words: Vec<(usize, String)> = Vec::new();
    let mut current: Option<(usize, String)> = None;
    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_whitespace() {
            match current.as_mut() {
                Some((_, word)) => word.push(ch),
                None => current = Some((i, ch.to_string())),
            }
        } else if let Some(word) = current.take() {
            words.push(word);
        }
    }
    if let Some(word) = current.take() {
        words.push(word);
    }

    let mut columns = Vec::with_capacity(words.len());
    for (i, (start, key)) in words.iter().enumerate() {
        let end = if i + 1 < words.len() {
            words[i + 1].0 - 1
        } else {
            chars.len().saturating_sub(1)
        };
        columns.push(Column {
            start: *start,
            end,
            key: key.clone(),
        });
    }
    columns
}

/// Extract one table row into per-column values. A value that overruns its
/// column is extended up to the next whitespace.
fn parse_row(line: &str, columns: &[Column]) -> Vec<String> {
    let chars: Vec<char> = line.trim_end().chars().collect();
    let mut values = Vec::with_capacity(columns.len());
    let mut begin = 0usize;
    for (i, column) in columns.iter().enumerate() {
        let mut end = begin + (column.end - column.start);
        let last = i == columns.len() - 1;
        if begin >= chars.len() {
            values.push(String::new());
        } else if last || end >= chars.len() {
            let value: String = chars[begin..].iter().collect();
            values.push(value.trim().to_string());
        } else if chars[end].is_whitespace() {
            let value: String = chars[begin..end].iter().collect();
            values.push(value.trim().to_string());
        } else {
            let mut value: String = chars[begin..end].iter().collect();
            while end < chars.len() && !chars[end].is_whitespace() {
                value.push(chars[end]);
                end += 1;
            }
            values.push(value.trim().to_string());
        }
        begin = end + 1;
    }
    values
}

type Row = HashMap<String, String>;

fn require(row: &Row, keys: &[&str], what: &str) -> Result<()> {
    if keys.iter().any(|k| !row.contains_key(*k)) {
        return Err(BoardnetError::invalid_report(format!(
            "invalid {what} file"
        )));
    }
    Ok(())
}

/// Parses EAGLE reports and populates a board with their content.
struct EagleReader {
    board: Board,
}

impl EagleReader {
    fn new() -> Self {
        Self {
            board: Board::new(),
        }
    }

    fn read_str(&mut self, text: &str) -> Result<()> {
        let mut lines = text.lines();
        let filetype = lines
            .next()
            .ok_or_else(|| BoardnetError::invalid_report("empty report"))?
            .trim()
            .to_string();

        // Preamble: version banner, export banner, then the table header
        let mut version = String::new();
        let mut columns: Vec<Column> = Vec::new();
        for line in lines.by_ref() {
            if HEADER_RE.is_match(line) {
                columns = header_columns(line);
                break;
            }
            if let Some(caps) = VERSION_RE.captures(line) {
                version = caps[1].to_string();
            }
            if let Some(caps) = EXPORT_RE.captures(line) {
                if &caps[2] != "sch" {
                    return Err(BoardnetError::invalid_report(
                        "reports must be generated from a schematic",
                    ));
                }
                self.board.name = caps[1].to_string();
            }
        }

        if self.board.name.is_empty() {
            return Err(BoardnetError::invalid_report("missing export banner"));
        }
        if version != "9.6.2" {
            return Err(BoardnetError::UnsupportedVersion {
                version,
                expected: "9.6.2".to_string(),
            });
        }
        if columns.is_empty() {
            return Err(BoardnetError::invalid_report("missing table header"));
        }

        let mut rows: Vec<Row> = Vec::new();
        for line in lines {
            if line.trim_end().is_empty() {
                continue;
            }
            let values = parse_row(line, &columns);
            rows.push(
                columns
                    .iter()
                    .map(|c| c.key.clone())
                    .zip(values)
                    .collect(),
            );
        }

        match filetype.as_str() {
            "Netlist" => self.parse_netlist(&rows),
            "Pinlist" => self.parse_pinlist(&rows),
            "Partlist" => self.parse_partlist(&rows),
            _ => Err(BoardnetError::invalid_report(format!(
                "unknown report type '{filetype}'"
            ))),
        }
    }

    fn parse_partlist(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            require(row, &["Part", "Value", "Device", "Package"], "partlist")?;

            let component = self.board.add_component(&row["Part"], &row["Package"])?;
            let c = self.board.component_mut(component);
            if !row["Device"].is_empty() {
                c.symbol = Some(row["Device"].clone());
            }
            if !row["Value"].is_empty() {
                c.value = Some(row["Value"].clone());
            }
        }
        Ok(())
    }

    fn parse_pinlist(&mut self, rows: &[Row]) -> Result<()> {
        let mut component: Option<ComponentId> = None;

        for row in rows {
            require(row, &["Part", "Pad", "Pin", "Net"], "pinlist")?;

            // A blank Part cell continues the previous component's pin rows
            let c = match component {
                Some(c) if row["Part"].is_empty() => c,
                _ => {
                    let c = self.board.get_component(&row["Part"])?;
                    component = Some(c);
                    c
                }
            };

            let pin = self.board.add_pin(c, &row["Pad"], &row["Pin"])?;

            // Intentionally-unconnected pins all land on one synthesized
            // no-connect wire
            if row["Net"] == "*** unconnected ***" {
                let nc = match self.board.get_wire("NC") {
                    Ok(w) => w,
                    Err(_) => {
                        let w = self.board.add_wire("NC")?;
                        self.board.wire_mut(w).kind = WireKind::NoConnect;
                        w
                    }
                };
                self.board.connect(nc, pin)?;
            }
        }
        Ok(())
    }

    fn parse_netlist(&mut self, rows: &[Row]) -> Result<()> {
        let mut wire: Option<WireId> = None;

        for row in rows {
            require(row, &["Net", "Part", "Pad"], "netlist")?;

            // A blank Net cell continues the previous net's node rows
            if !row["Net"].is_empty() {
                wire = Some(self.board.add_wire(&row["Net"])?);
            }
            let w = wire.ok_or_else(|| {
                BoardnetError::invalid_report("node row before any net name")
            })?;

            let component = self.board.get_component(&row["Part"])?;
            let pin = self.board.get_pin(component, &row["Pad"])?;
            self.board.connect(w, pin)?;
        }
        Ok(())
    }
}

/// Read an EAGLE report triple and return the populated board.
///
/// The partlist defines components, the pinlist their pins (synthesizing
/// the `NC` wire), and the netlist the named wires, so the files are read
/// in that dependency order regardless of argument order.
pub fn read_eagle(
    nets: impl AsRef<Path>,
    pins: impl AsRef<Path>,
    parts: impl AsRef<Path>,
) -> Result<Board> {
    let mut reader = EagleReader::new();

    for path in [parts.as_ref(), pins.as_ref(), nets.as_ref()] {
        let text = std::fs::read_to_string(path).map_err(|e| BoardnetError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(file = %path.display(), "reading eagle report");
        if let Err(err) = reader.read_str(&text) {
            warn!(file = %path.display(), error = %err, "eagle report read failed");
            return Err(err);
        }
    }

    Ok(reader.board)
}
