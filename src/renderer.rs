// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Rendering and materialization for extracted notes.
//!
//! This module turns [`Note`] values into their two output forms: a
//! pretty-printed console listing and a directory tree of Markdown files,
//! one file per note, one subdirectory per folder.
//!
//! # Output Format
//!
//! Field values are interpolated verbatim in both forms. A title or body
//! containing the template's own delimiter lines will look ambiguous in
//! the output; that is intentional, so that rendered files stay
//! byte-for-byte stable across versions.
//!
//! # Example
//!
//! ```
//! use sn2md::parser::Note;
//! use sn2md::renderer::render_note;
//!
//! let note = Note {
//!     folder: "Work".into(),
//!     time: "Tuesday, November 14, 2023 22:13:20".into(),
//!     date: "2023_11_14".into(),
//!     title: "Standup".into(),
//!     text: "Ship the release.".into(),
//! };
//!
//! let markdown = render_note(&note);
//! assert!(markdown.starts_with("---\ntime: Tuesday"));
//! assert!(markdown.ends_with("Ship the release."));
//! ```

use crate::parser::Note;
use snafu::prelude::*;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Error type for file-system materialization failures.
#[derive(Debug, Snafu)]
pub enum WriteError {
    /// The target output directory already exists.
    ///
    /// Materialization never merges into an existing tree.
    #[snafu(display("output directory already exists: {}", path.display()))]
    OutputExists {
        /// The pre-existing output path.
        path: PathBuf,
    },

    /// Failed to create the output directory or a folder subdirectory.
    #[snafu(display("failed to create {}: {source}", path.display()))]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a note's Markdown file.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteNote {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Renders one note as Markdown.
///
/// Fixed template: a front-matter block with the note's `time` and
/// `title`, a blank line, then the body text. No trailing newline and no
/// escaping of field values.
#[must_use]
pub fn render_note(note: &Note) -> String {
    format!(
        "---\ntime: {}\ntitle: {}\n---\n\n{}",
        note.time, note.title, note.text
    )
}

/// Renders a note list for the console, in list order.
///
/// Each note gets a 30-dash separator line, a front-matter block with
/// `folder`, `title`, and `time`, then the body text.
#[must_use]
pub fn render_pretty(notes: &[Note]) -> String {
    let mut out = String::new();
    for note in notes {
        writeln!(out, "{}", "-".repeat(30)).unwrap();
        writeln!(out, "---").unwrap();
        writeln!(out, "folder: {}", note.folder).unwrap();
        writeln!(out, "title: {}", note.title).unwrap();
        writeln!(out, "time: {}", note.time).unwrap();
        writeln!(out, "---").unwrap();
        writeln!(out, "{}", note.text).unwrap();
    }
    out
}

/// Materializes a note list as a directory tree under `output`.
///
/// Creates `output` as a new directory, one subdirectory per folder name,
/// and one `<date>.md` file per note. Two notes sharing a folder and a
/// date collapse to one file holding the later note's content.
///
/// # Errors
///
/// Fails with [`WriteError::OutputExists`] when `output` is already
/// present, and with an I/O-wrapping variant when a directory or file
/// cannot be created. Notes written before a mid-run failure are left on
/// disk; there is no cleanup pass.
pub fn extract_to_directory(notes: &[Note], output: &Path) -> Result<(), WriteError> {
    match std::fs::create_dir(output) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            return OutputExistsSnafu { path: output }.fail();
        }
        Err(source) => {
            return Err(WriteError::CreateDir {
                path: output.to_path_buf(),
                source,
            });
        }
    }

    for note in notes {
        let folder_dir = output.join(&note.folder);
        std::fs::create_dir_all(&folder_dir).context(CreateDirSnafu { path: &folder_dir })?;

        let file = folder_dir.join(format!("{}.md", note.date));
        std::fs::write(&file, render_note(note)).context(WriteNoteSnafu { path: &file })?;
    }

    Ok(())
}
