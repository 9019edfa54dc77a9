//! Parser for the interaction event log.
//!
//! Format: comma-separated with a header row naming at least
//! `userId`, `videoId` and `interactionValue`. Other columns (timestamps,
//! event types) are ignored. Fields are not quoted.

use crate::error::{DataLoadError, Result};
use crate::types::RawInteraction;
use std::fs;
use std::path::Path;

pub const USER_COLUMN: &str = "userId";
pub const VIDEO_COLUMN: &str = "videoId";
pub const VALUE_COLUMN: &str = "interactionValue";

/// Read and parse an interactions CSV file
pub fn parse_interactions(path: &Path) -> Result<Vec<RawInteraction>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_interactions_str(&content, &file_name)
}

/// Parse CSV text; `file` is only used in error messages
pub fn parse_interactions_str(content: &str, file: &str) -> Result<Vec<RawInteraction>> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line: 1,
        reason: "Missing header row".to_string(),
    })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let position = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| DataLoadError::MissingColumn {
                file: file.to_string(),
                column: name.to_string(),
            })
    };
    let user_col = position(USER_COLUMN)?;
    let video_col = position(VIDEO_COLUMN)?;
    let value_col = position(VALUE_COLUMN)?;

    let mut interactions = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != columns.len() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!(
                    "Expected {} fields but found {}",
                    columns.len(),
                    fields.len()
                ),
            });
        }

        let user_key = fields[user_col];
        let video_key = fields[video_col];
        if user_key.is_empty() || video_key.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Empty userId or videoId".to_string(),
            });
        }

        let value: f32 = fields[value_col]
            .parse()
            .map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid interactionValue: {}", e),
            })?;

        interactions.push(RawInteraction::new(user_key, video_key, value));
    }

    Ok(interactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let csv = "userId,videoId,interactionValue\nu001,v001,2\nu001,v001,1\n\nu002,v003,4\n";
        let parsed = parse_interactions_str(csv, "interactions.csv").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], RawInteraction::new("u001", "v001", 2.0));
        assert_eq!(parsed[2], RawInteraction::new("u002", "v003", 4.0));
    }

    #[test]
    fn test_extra_columns_and_order() {
        let csv = "timestamp,videoId,userId,interactionValue,type\n17,v9,u1,0.5,view\n";
        let parsed = parse_interactions_str(csv, "x.csv").unwrap();
        assert_eq!(parsed, vec![RawInteraction::new("u1", "v9", 0.5)]);
    }

    #[test]
    fn test_missing_column() {
        let err = parse_interactions_str("userId,videoId\nu1,v1\n", "x.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == VALUE_COLUMN));
    }

    #[test]
    fn test_bad_value_reports_line() {
        let csv = "userId,videoId,interactionValue\nu1,v1,1\nu1,v2,lots\n";
        let err = parse_interactions_str(csv, "x.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_wrong_field_count() {
        let csv = "userId,videoId,interactionValue\nu1,v1\n";
        assert!(matches!(
            parse_interactions_str(csv, "x.csv"),
            Err(DataLoadError::ParseError { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_interactions_str("", "x.csv").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_interactions(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
