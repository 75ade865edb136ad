//! Pipeline drivers: one file in, one generated source file out, plus the
//! directory batch mode that repeats the single-file pipeline per matched
//! file.
//!
//! Data flows strictly forward: raw mapping, token-resolved mapping, filtered
//! mapping, record forest, generated source text. Each invocation owns its
//! forest; nothing is shared across calls.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::formats::{Format, SUPPORTED_EXTENSIONS};
use crate::tokens::TokenReport;
use crate::{codegen, filter, infer, tokens};

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Generate every field as a defaulted `Option`.
    pub init_none: bool,
    /// Run the token resolver before inference.
    pub resolve: bool,
    /// Dotted paths to drop before inference.
    pub ignore: Vec<String>,
}

/// What one pipeline run did, for caller-side reporting.
#[derive(Debug, Default, Clone)]
pub struct Report {
    pub records: usize,
    pub removed_paths: Vec<String>,
    pub unmatched_ignores: Vec<String>,
    pub unresolved_tokens: Vec<String>,
}

/// Run resolve -> filter -> infer -> emit -> write for one file.
///
/// The format check runs first, so an unsupported extension never creates an
/// output file.
pub fn file_to_code(input: &Path, output: &Path, options: &Options) -> Result<Report> {
    let format = Format::from_path(input)?;
    let map = format.load(input)?;

    let (map, token_report) = if options.resolve {
        tokens::resolve_mapping_env(&map)
    } else {
        (map, TokenReport::default())
    };
    for name in &token_report.unresolved {
        warn!(token = %name, "token left unresolved");
    }

    let (map, ignore_report) = filter::apply_ignore(&map, &options.ignore);
    for path in &ignore_report.unmatched {
        warn!(path = %path, "ignore path matched nothing");
    }

    let forest = infer::infer(&map)?;
    let source = codegen::emit(&forest, options.init_none);
    codegen::write(&source, output)?;
    debug!(records = forest.len(), output = %output.display(), "generated");

    Ok(Report {
        records: forest.len(),
        removed_paths: ignore_report.removed,
        unmatched_ignores: ignore_report.unmatched,
        unresolved_tokens: token_report.unresolved,
    })
}

/// One file of a directory batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<Report>,
}

/// Run the pipeline for every supported file under `input_dir`.
///
/// Output paths are `prefix + stem + suffix + ".rs"`, mirroring each input's
/// relative position when `recursive` is set. Files are independent, so the
/// batch fans out on rayon; a failing file is reported in its outcome and the
/// rest keep going.
pub fn dir_to_code(
    input_dir: &Path,
    output_dir: &Path,
    recursive: bool,
    prefix: &str,
    suffix: &str,
    options: &Options,
) -> Result<Vec<BatchOutcome>> {
    if !input_dir.is_dir() {
        return Err(Error::io(
            input_dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input path is not a directory"),
        ));
    }

    let files = matched_files(input_dir, recursive)?;
    debug!(count = files.len(), "directory batch");

    Ok(files
        .into_par_iter()
        .map(|input| {
            let output = output_path(&input, input_dir, output_dir, recursive, prefix, suffix);
            let result = file_to_code(&input, &output, options);
            BatchOutcome {
                input,
                output,
                result,
            }
        })
        .collect())
}

fn matched_files(input_dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ext in SUPPORTED_EXTENSIONS {
        let pattern = if recursive {
            format!("{}/**/*.{ext}", input_dir.display())
        } else {
            format!("{}/*.{ext}", input_dir.display())
        };
        let entries =
            glob::glob(&pattern).map_err(|e| Error::parse(input_dir, e.to_string()))?;
        for entry in entries {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(Error::io(path, e.into_error()));
                }
            }
        }
    }
    // glob yields per-extension groups; a stable overall order keeps batch
    // output deterministic
    files.sort();
    Ok(files)
}

fn output_path(
    input: &Path,
    input_dir: &Path,
    output_dir: &Path,
    recursive: bool,
    prefix: &str,
    suffix: &str,
) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("config");
    let file_name = format!("{prefix}{stem}{suffix}.rs");
    if recursive {
        if let Ok(relative) = input.strip_prefix(input_dir) {
            if let Some(parent) = relative.parent() {
                return output_dir.join(parent).join(file_name);
            }
        }
    }
    output_dir.join(file_name)
}

// ------------------------------- Tests ------------------------------------ //
