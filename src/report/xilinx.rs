//! Reader for Xilinx/Vivado I/O reports.
//!
//! The report carries a `+----+----+` ruled table; the `Signal Name` and
//! `Pin Number` columns describe the device's external pin list, which maps
//! onto an [`Rtl`] group pairable with a board interface.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{BoardnetError, Result};
use crate::model::Rtl;

static RULER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\+-+){2,}").unwrap());

fn cell(line: &str, start: usize, end: usize) -> String {
    line.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse an I/O report's table into an rtl group with the given name.
pub fn parse_io_report(name: &str, text: &str) -> Result<Rtl> {
    let mut lines = text.lines();

    // Preamble runs until the first table ruler; the '+' positions define
    // the column spans
    let mut cols: Vec<(usize, usize)> = Vec::new();
    for line in lines.by_ref() {
        if RULER_RE.is_match(line) {
            let plus: Vec<usize> = line
                .char_indices()
                .filter(|&(_, ch)| ch == '+')
                .map(|(i, _)| i)
                .collect();
            cols = plus.windows(2).map(|w| (w[0] + 1, w[1] - 1)).collect();
            break;
        }
    }
    if cols.is_empty() {
        return Err(BoardnetError::invalid_report("missing io table"));
    }

    let header = lines
        .next()
        .ok_or_else(|| BoardnetError::invalid_report("truncated io report"))?;
    let keys: Vec<String> = cols.iter().map(|&(l, u)| cell(header, l, u)).collect();

    let delimiter = format!(
        "+{}+",
        cols.iter()
            .map(|&(l, u)| "-".repeat(u - l + 1))
            .collect::<Vec<_>>()
            .join("+")
    );
    let ruled = lines
        .next()
        .ok_or_else(|| BoardnetError::invalid_report("truncated io report"))?;
    if ruled.trim() != delimiter {
        return Err(BoardnetError::invalid_report("malformed io table"));
    }

    let mut rtl = Rtl::new(name);
    for line in lines {
        if line.trim() == delimiter {
            break;
        }
        let row: HashMap<&str, String> = keys
            .iter()
            .map(String::as_str)
            .zip(cols.iter().map(|&(l, u)| cell(line, l, u)))
            .collect();

        let (Some(signal), Some(location)) = (row.get("Signal Name"), row.get("Pin Number"))
        else {
            continue;
        };
        if signal.is_empty() || location.is_empty() {
            continue;
        }
        rtl.add_signal(signal, location);
    }

    debug!(rtl = %rtl.name, signals = rtl.signal_count(), "read io report");
    Ok(rtl)
}

/// Read a Xilinx I/O report file and return the rtl group, named after the
/// file stem.
pub fn read_xilinx_io(path: impl AsRef<Path>) -> Result<Rtl> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| BoardnetError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_io_report(&name, &text)
}
