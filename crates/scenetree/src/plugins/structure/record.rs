//! Line record extraction
//!
//! Turns raw structure lines into [`LineRecord`]s. Line grammar:
//!
//! ```text
//! <spaces><type>[*][: <annotation>]
//! ```
//!
//! Leading spaces give the depth, a `*` after the type (or at the very end of
//! the line) marks a type that likely repeats under the same parent, and the
//! text after the first `:` is a free-form annotation.

use tracing::trace;

use crate::core::DiagramError;

/// Character marking a record whose siblings likely repeat
pub const REPEATS_MARKER: char = '*';

/// One parsed structure line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// 1-based line number in the source
    pub line: usize,
    /// Number of leading spaces
    pub depth: usize,
    pub node_type: String,
    pub annotation: Option<String>,
    pub repeats: bool,
}

impl LineRecord {
    /// Display label: the type, plus the annotation in brackets
    pub fn label(&self) -> String {
        match &self.annotation {
            Some(annotation) => format!("{} [{}]", self.node_type, annotation),
            None => self.node_type.clone(),
        }
    }
}

/// Extract a record from one raw line
///
/// Returns `Ok(None)` for a blank line, which terminates the structure.
pub fn extract_record(raw: &str, line: usize) -> Result<Option<LineRecord>, DiagramError> {
    let stripped = raw.trim_end();
    if stripped.is_empty() {
        return Ok(None);
    }

    let body = stripped.trim_start_matches(' ');
    let depth = stripped.len() - body.len();
    if let Some(ch) = body.chars().next().filter(|c| c.is_whitespace()) {
        return Err(DiagramError::InvalidIndentation { line, ch });
    }

    let (head, annotation) = match body.split_once(':') {
        Some((head, rest)) => {
            let rest = rest.trim();
            let rest = rest.strip_suffix(REPEATS_MARKER).unwrap_or(rest).trim_end();
            (head.trim_end(), (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (body, None),
    };

    let marked = head.ends_with(REPEATS_MARKER);
    let node_type = head.trim_end_matches(REPEATS_MARKER).trim_end();
    if node_type.is_empty() {
        return Err(DiagramError::unknown_node_type(node_type, line));
    }

    let record = LineRecord {
        line,
        depth,
        node_type: node_type.to_string(),
        annotation,
        repeats: marked || stripped.ends_with(REPEATS_MARKER),
    };
    trace!(
        line,
        depth,
        node_type = %record.node_type,
        repeats = record.repeats,
        "Extracted line record"
    );
    Ok(Some(record))
}

/// Extract records from every line up to the first blank line
pub fn extract_records<'a, I>(lines: I) -> Result<Vec<LineRecord>, DiagramError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    for (index, raw) in lines.into_iter().enumerate() {
        match extract_record(raw, index + 1)? {
            Some(record) => records.push(record),
            None => break,
        }
    }
    Ok(records)
}
