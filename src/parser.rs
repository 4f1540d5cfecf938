// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing and note extraction for Scarlet Notes backup exports.
//!
//! This module handles deserialization of the JSON backup produced by the
//! Scarlet Notes app and the transformation of raw note records into
//! renderer-ready [`Note`] values.
//!
//! # Format Overview
//!
//! A backup export contains:
//! - A `folders` array mapping folder UUIDs to display titles
//! - A `notes` array where each note carries a folder reference, a
//!   millisecond timestamp, and a `description` string that is itself a
//!   serialized JSON document holding the note's text blocks
//!
//! # Example
//!
//! ```
//! use sn2md::parser::{parse_export, resolve_folders, extract_notes};
//!
//! let json = r#"{
//!     "folders": [{ "uuid": "f1", "title": "Work" }],
//!     "notes": [{
//!         "folder": "f1",
//!         "timestamp": 1700000000123,
//!         "description": "{\"note\":[{\"text\":\"Standup\"},{\"text\":\"Ship the release.\"}]}"
//!     }]
//! }"#;
//!
//! let export = parse_export(json).unwrap();
//! let folders = resolve_folders(&export);
//! let notes = extract_notes(&export, &folders).unwrap();
//!
//! assert_eq!(notes[0].folder, "Work");
//! assert_eq!(notes[0].title, "Standup");
//! ```

use chrono::DateTime;
use serde::Deserialize;
use snafu::prelude::*;
use std::collections::HashMap;

/// Error type for JSON parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse the export file as JSON.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// Error type for failures while turning raw records into [`Note`]s.
#[derive(Debug, Snafu)]
pub enum ExtractError {
    /// A note references a folder UUID that is not in the export's
    /// `folders` array.
    #[snafu(display("note references unknown folder {uuid:?}"))]
    UnknownFolder {
        /// The unresolvable folder UUID.
        uuid: String,
    },

    /// The timestamp could not be reduced to epoch seconds.
    ///
    /// Timestamps are expected to be epoch milliseconds; anything too
    /// short to carry a three-digit millisecond suffix ends up here.
    #[snafu(display("invalid note timestamp {timestamp}"))]
    InvalidTimestamp {
        /// The raw timestamp value from the export.
        timestamp: i64,
    },

    /// The `description` payload is not valid JSON of the expected shape.
    #[snafu(display("failed to parse note body: {source}"))]
    NoteBody {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },

    /// The `description` payload parsed but contains no text blocks.
    #[snafu(display("note body contains no text blocks"))]
    EmptyBody,
}

/// The root structure of a Scarlet Notes backup export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotesExport {
    /// Every folder defined in the export.
    pub folders: Vec<Folder>,

    /// Every note in the export, in document order.
    pub notes: Vec<RawNote>,
}

/// A folder definition from the export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    /// Opaque identifier, unique within one export.
    pub uuid: String,

    /// Display name shown in the app.
    pub title: String,
}

/// A note exactly as stored in the export, before extraction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawNote {
    /// UUID of the folder this note belongs to.
    ///
    /// `None` (or an empty string) marks a note with no folder; the
    /// extractor drops such notes.
    #[serde(default)]
    pub folder: Option<String>,

    /// Unix timestamp in epoch milliseconds.
    pub timestamp: i64,

    /// The note's rich-text body, stored as a serialized JSON document
    /// of shape `{"note": [{"text": "..."}, ...]}`.
    pub description: String,
}

/// The typed shape of a note's `description` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct NoteBody {
    note: Vec<TextBlock>,
}

/// One text segment of a note body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TextBlock {
    text: String,
}

/// A fully resolved, renderer-ready note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Resolved folder display name.
    pub folder: String,

    /// Human-readable timestamp, e.g. `Tuesday, November 14, 2023 22:13:20`.
    pub time: String,

    /// Sortable date used as the output file stem, e.g. `2023_11_14`.
    pub date: String,

    /// The first text block's content, or `"Empty"` for single-block notes.
    pub title: String,

    /// The note's body text.
    pub text: String,
}

/// Parses a JSON string into a [`NotesExport`] structure.
///
/// This is the entry point for loading a backup file's content.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or doesn't match the expected
/// export schema.
///
/// # Example
///
/// ```
/// use sn2md::parser::parse_export;
///
/// let export = parse_export(r#"{ "folders": [], "notes": [] }"#).unwrap();
/// assert!(export.notes.is_empty());
/// ```
pub fn parse_export(json_str: &str) -> Result<NotesExport, ParseError> {
    serde_json::from_str(json_str).context(JsonSnafu)
}

/// Builds the folder UUID to display-name mapping for an export.
///
/// A single pass over the `folders` array; a duplicate UUID silently
/// overwrites the earlier entry (last wins).
#[must_use]
pub fn resolve_folders(export: &NotesExport) -> HashMap<String, String> {
    export
        .folders
        .iter()
        .map(|folder| (folder.uuid.clone(), folder.title.clone()))
        .collect()
}

/// Extracts renderer-ready [`Note`]s from an export, in document order.
///
/// Notes with an absent or empty folder reference are dropped: the app
/// leaves them behind in the export after their folder is deleted, and
/// there is no folder to file them under.
///
/// # Errors
///
/// Fails on the first note whose folder UUID is missing from `folders`,
/// whose timestamp cannot be normalized, or whose body payload is
/// malformed or empty. No partial result is returned.
pub fn extract_notes(
    export: &NotesExport,
    folders: &HashMap<String, String>,
) -> Result<Vec<Note>, ExtractError> {
    let mut notes = Vec::new();

    for raw in &export.notes {
        let Some(uuid) = raw.folder.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        let folder = folders
            .get(uuid)
            .cloned()
            .context(UnknownFolderSnafu { uuid })?;

        let seconds = timestamp_seconds(raw.timestamp).context(InvalidTimestampSnafu {
            timestamp: raw.timestamp,
        })?;
        let moment = DateTime::from_timestamp(seconds, 0).context(InvalidTimestampSnafu {
            timestamp: raw.timestamp,
        })?;
        let time = moment.format("%A, %B %d, %Y %H:%M:%S").to_string();
        let date = moment.format("%Y_%m_%d").to_string();

        let body: NoteBody = serde_json::from_str(&raw.description).context(NoteBodySnafu)?;
        let (title, text) = match body.note.as_slice() {
            [] => return EmptyBodySnafu.fail(),
            [only] => ("Empty".to_owned(), only.text.clone()),
            [first, second, ..] => (first.text.clone(), second.text.clone()),
        };

        notes.push(Note {
            folder,
            time,
            date,
            title,
            text,
        });
    }

    Ok(notes)
}

/// Reduces an epoch-millisecond timestamp to epoch seconds.
///
/// The export stores milliseconds; dropping the three trailing decimal
/// digits yields seconds. Done as digit truncation rather than division
/// to match the export's own convention exactly.
fn timestamp_seconds(timestamp: i64) -> Option<i64> {
    let digits = timestamp.to_string();
    let end = digits.len().checked_sub(3)?;
    digits[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_json(folders: &str, notes: &str) -> String {
        format!(r#"{{ "folders": [{folders}], "notes": [{notes}] }}"#)
    }

    fn folder_json(uuid: &str, title: &str) -> String {
        format!(r#"{{ "uuid": "{uuid}", "title": "{title}" }}"#)
    }

    fn description_json(blocks: &[&str]) -> String {
        let blocks = blocks
            .iter()
            .map(|text| format!(r#"{{"text":"{text}"}}"#))
            .collect::<Vec<_>>()
            .join(",");
        let inner = format!(r#"{{"note":[{blocks}]}}"#);
        serde_json::to_string(&inner).unwrap()
    }

    fn note_json(folder: &str, timestamp: i64, blocks: &[&str]) -> String {
        format!(
            r#"{{ "folder": "{folder}", "timestamp": {timestamp}, "description": {} }}"#,
            description_json(blocks)
        )
    }

    fn unfiled_note_json(blocks: &[&str]) -> String {
        format!(
            r#"{{ "folder": null, "timestamp": 1700000000123, "description": {} }}"#,
            description_json(blocks)
        )
    }

    fn work_export(notes: &str) -> NotesExport {
        parse_export(&export_json(&folder_json("f1", "Work"), notes)).unwrap()
    }

    #[test]
    fn parses_minimal_export() {
        let export = work_export(&note_json("f1", 1_700_000_000_123, &["Title", "Body"]));

        assert_eq!(export.folders.len(), 1);
        assert_eq!(export.folders[0].title, "Work");
        assert_eq!(export.notes.len(), 1);
        assert_eq!(export.notes[0].folder.as_deref(), Some("f1"));
        assert_eq!(export.notes[0].timestamp, 1_700_000_000_123);
    }

    #[test]
    fn parses_null_folder_as_none() {
        let export = work_export(&unfiled_note_json(&["Body"]));
        assert!(export.notes[0].folder.is_none());
    }

    #[test]
    fn parses_missing_folder_field_as_none() {
        let json = export_json(
            "",
            &format!(
                r#"{{ "timestamp": 1700000000123, "description": {} }}"#,
                description_json(&["Body"])
            ),
        );
        let export = parse_export(&json).unwrap();

        assert!(export.notes[0].folder.is_none());
    }

    #[test]
    fn returns_error_for_invalid_json() {
        assert!(parse_export("not valid json").is_err());
    }

    #[test]
    fn returns_error_for_missing_top_level_fields() {
        assert!(parse_export(r#"{ "folders": [] }"#).is_err());
    }

    #[test]
    fn resolves_folders() {
        let export = parse_export(&export_json(
            &format!(
                "{}, {}",
                folder_json("f1", "Work"),
                folder_json("f2", "Home")
            ),
            "",
        ))
        .unwrap();
        let folders = resolve_folders(&export);

        assert_eq!(folders.len(), 2);
        assert_eq!(folders["f1"], "Work");
        assert_eq!(folders["f2"], "Home");
    }

    #[test]
    fn duplicate_folder_uuid_last_wins() {
        let export = parse_export(&export_json(
            &format!("{}, {}", folder_json("f1", "Old"), folder_json("f1", "New")),
            "",
        ))
        .unwrap();
        let folders = resolve_folders(&export);

        assert_eq!(folders.len(), 1);
        assert_eq!(folders["f1"], "New");
    }

    #[test]
    fn folder_resolution_is_idempotent() {
        let export = work_export("");
        assert_eq!(resolve_folders(&export), resolve_folders(&export));
    }

    #[test]
    fn extracts_note_fields() {
        let export = work_export(&note_json("f1", 1_700_000_000_123, &["Standup", "Notes"]));
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].folder, "Work");
        assert_eq!(notes[0].title, "Standup");
        assert_eq!(notes[0].text, "Notes");
    }

    #[test]
    fn formats_timestamp_from_milliseconds() {
        let export = work_export(&note_json("f1", 1_700_000_000_123, &["T", "B"]));
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert_eq!(notes[0].time, "Tuesday, November 14, 2023 22:13:20");
        assert_eq!(notes[0].date, "2023_11_14");
    }

    #[test]
    fn single_block_title_falls_back_to_empty() {
        let export = work_export(&note_json("f1", 1_700_000_000_123, &["Only block"]));
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert_eq!(notes[0].title, "Empty");
        assert_eq!(notes[0].text, "Only block");
    }

    #[test]
    fn blocks_past_the_second_are_ignored() {
        let export = work_export(&note_json(
            "f1",
            1_700_000_000_123,
            &["First", "Second", "Third"],
        ));
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert_eq!(notes[0].title, "First");
        assert_eq!(notes[0].text, "Second");
    }

    #[test]
    fn drops_note_with_null_folder() {
        let export = work_export(&format!(
            "{}, {}",
            unfiled_note_json(&["Gone"]),
            note_json("f1", 1_700_000_000_123, &["Kept", "Body"])
        ));
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Kept");
    }

    #[test]
    fn drops_note_with_empty_folder() {
        let export = work_export(&note_json("", 1_700_000_000_123, &["Gone"]));
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert!(notes.is_empty());
    }

    #[test]
    fn unknown_folder_is_fatal() {
        let export = work_export(&note_json("missing", 1_700_000_000_123, &["T", "B"]));
        let err = extract_notes(&export, &resolve_folders(&export)).unwrap_err();

        match err {
            ExtractError::UnknownFolder { uuid } => assert_eq!(uuid, "missing"),
            other => panic!("Expected UnknownFolder, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_fatal() {
        let json = export_json(
            &folder_json("f1", "Work"),
            r#"{ "folder": "f1", "timestamp": 1700000000123, "description": "not json" }"#,
        );
        let export = parse_export(&json).unwrap();
        let err = extract_notes(&export, &resolve_folders(&export)).unwrap_err();

        assert!(matches!(err, ExtractError::NoteBody { .. }));
    }

    #[test]
    fn zero_block_body_is_fatal() {
        let export = work_export(&note_json("f1", 1_700_000_000_123, &[]));
        let err = extract_notes(&export, &resolve_folders(&export)).unwrap_err();

        assert!(matches!(err, ExtractError::EmptyBody));
    }

    #[test]
    fn too_short_timestamp_is_fatal() {
        let export = work_export(&note_json("f1", 42, &["T", "B"]));
        let err = extract_notes(&export, &resolve_folders(&export)).unwrap_err();

        match err {
            ExtractError::InvalidTimestamp { timestamp } => assert_eq!(timestamp, 42),
            other => panic!("Expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn preserves_document_order() {
        let export = parse_export(&export_json(
            &format!(
                "{}, {}",
                folder_json("f1", "Work"),
                folder_json("f2", "Home")
            ),
            &format!(
                "{}, {}",
                note_json("f2", 1_700_000_000_123, &["Second folder", "B"]),
                note_json("f1", 1_700_000_000_123, &["First folder", "B"])
            ),
        ))
        .unwrap();
        let notes = extract_notes(&export, &resolve_folders(&export)).unwrap();

        assert_eq!(notes[0].folder, "Home");
        assert_eq!(notes[1].folder, "Work");
    }
}
