//! Splitting a template file into its metadata block and body text

use std::path::Path;

use crate::config::ExpandConfig;
use crate::error::{ParseError, Span};

use super::registry::{Template, TemplateDef};

/// Where the scanner is relative to the metadata block
enum BlockState {
    /// No block seen yet
    Before,
    /// Inside the block that opened on `line` at byte `start`
    Inside { line: usize, start: usize },
    /// The block has been read; later markers are body text
    After,
}

/// Parse the text of a template file.
///
/// Lines between the begin and end markers form a JSON metadata record. Every
/// other line is body text and is kept verbatim, line terminator included.
/// Only the first block is metadata. A file without a block yields an inert
/// template.
pub fn parse_template(
    source: &str,
    module_name: &str,
    path: &Path,
    config: &ExpandConfig,
) -> Result<Template, ParseError> {
    let mut state = BlockState::Before;
    let mut metadata = String::new();
    // Byte offset in `source` of each line of `metadata`
    let mut metadata_lines = Vec::new();
    let mut body_lines = Vec::new();
    let mut def: Option<TemplateDef> = None;
    let mut offset = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let text = line.trim_end_matches(['\n', '\r']);
        match state {
            BlockState::Before if config.begin_marker.is_match(text) => {
                state = BlockState::Inside {
                    line: index + 1,
                    start: offset,
                };
            }
            BlockState::Inside { .. } if config.end_marker.is_match(text) => {
                def = Some(parse_metadata(&metadata, &metadata_lines, source, path)?);
                state = BlockState::After;
            }
            BlockState::Inside { .. } => {
                metadata_lines.push(offset);
                metadata.push_str(line);
            }
            BlockState::Before | BlockState::After => body_lines.push(line.to_string()),
        }
        offset += line.len();
    }

    if let BlockState::Inside { line, start } = state {
        let end = source[start..]
            .find('\n')
            .map_or(source.len(), |n| start + n);
        return Err(ParseError::Unterminated {
            path: path.to_path_buf(),
            line,
            span: start..end,
        });
    }

    Ok(match def {
        Some(mut def) => {
            def.body_lines = body_lines;
            Template::with_def(module_name, path, def)
        }
        None => Template::inert(module_name, path),
    })
}

fn parse_metadata(
    metadata: &str,
    line_offsets: &[usize],
    source: &str,
    path: &Path,
) -> Result<TemplateDef, ParseError> {
    serde_json::from_str(metadata).map_err(|err| ParseError::Metadata {
        path: path.to_path_buf(),
        span: error_span(&err, line_offsets, source.len()),
        source: err,
    })
}

/// Map a JSON error position back to a byte range in the template file
fn error_span(err: &serde_json::Error, line_offsets: &[usize], len: usize) -> Span {
    let start = match (err.line().checked_sub(1), line_offsets.last()) {
        (Some(line), _) if line < line_offsets.len() => {
            line_offsets[line] + err.column().saturating_sub(1)
        }
        (_, Some(&last)) => last,
        (_, None) => 0,
    };
    let start = start.min(len);
    start..(start + 1).min(len)
}
