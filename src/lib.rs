// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Scarlet Notes backup exports to Markdown.
//!
//! This crate provides parsing and rendering functionality for transforming
//! the JSON backup exported by the Scarlet Notes app into a console listing
//! or a directory tree of Markdown files.
//!
//! # Overview
//!
//! Scarlet Notes backs up folders and notes as a single JSON file. This
//! crate:
//!
//! 1. Parses the JSON structure into typed Rust representations
//! 2. Resolves each note's folder reference and timestamp
//! 3. Renders the notes as Markdown, either to stdout or one file per note
//!
//! # Example
//!
//! ```no_run
//! use sn2md::{parser, renderer};
//!
//! let json = std::fs::read_to_string("backup.json").unwrap();
//! let export = parser::parse_export(&json).unwrap();
//!
//! let folders = parser::resolve_folders(&export);
//! let notes = parser::extract_notes(&export, &folders).unwrap();
//!
//! print!("{}", renderer::render_pretty(&notes));
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing, folder resolution, and note extraction
//! - [`renderer`]: console output, Markdown templates, and the
//!   file-system materializer

#![deny(missing_docs)]

pub mod parser;
pub mod renderer;
