// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for sn2md.
//!
//! This binary provides the `sn2md` command for converting Scarlet Notes
//! JSON backup exports to Markdown, either pretty-printed to stdout or
//! written as one Markdown file per note.

use lexopt::prelude::*;
use sn2md::parser::{self, NotesExport};
use sn2md::renderer;
use snafu::prelude::*;
use std::path::{Path, PathBuf};

/// What to do with the extracted notes.
enum Mode {
    /// Pretty-print every note to stdout.
    Print,
    /// Write one Markdown file per note under the given directory.
    Extract(PathBuf),
}

struct Cli {
    input: PathBuf,
    mode: Mode,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("Invalid file path: {}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("File's content doesn't seem to be JSON: {}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: parser::ParseError,
    },

    #[snafu(display("failed to extract notes from {}: {source}", path.display()))]
    Extract {
        path: PathBuf,
        source: parser::ExtractError,
    },

    #[snafu(display("failed to write output: {source}"))]
    Write { source: renderer::WriteError },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert Scarlet Notes backup exports to Markdown

Usage: {name} <OPTION> <FILE>

Options:
  -p, --print          Pretty-print every note to stdout
  -e, --extract <DIR>  Write one Markdown file per note under DIR,
                       grouped by folder (DIR must not exist)
  -h, --help           Print help
  -V, --version        Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    let mut input: Option<PathBuf> = None;
    let mut mode: Option<Mode> = None;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('p') | Long("print") => mode = Some(Mode::Print),
            Short('e') | Long("extract") => {
                let dir: PathBuf = parser.value()?.parse()?;
                mode = Some(Mode::Extract(dir));
            }
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input = Some(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    // Missing input or mode means the user wants the usage text, not an error
    let (Some(input), Some(mode)) = (input, mode) else {
        print_help();
        std::process::exit(0);
    };

    Ok(Cli { input, mode })
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;

    let export = load(&cli.input)?;
    let folders = parser::resolve_folders(&export);
    let notes =
        parser::extract_notes(&export, &folders).context(ExtractSnafu { path: &cli.input })?;

    match &cli.mode {
        Mode::Print => print!("{}", renderer::render_pretty(&notes)),
        Mode::Extract(dir) => {
            renderer::extract_to_directory(&notes, dir).context(WriteSnafu)?;
            eprintln!("Wrote {} notes under {}", notes.len(), dir.display());
        }
    }

    Ok(())
}

/// Reads and parses one export file.
fn load(path: &Path) -> Result<NotesExport, Error> {
    let json = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    parser::parse_export(&json).context(ParseFileSnafu { path })
}
