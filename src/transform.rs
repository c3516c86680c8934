use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::{debug, error, info, warn};

use crate::coerce::coerce_value;
use crate::manipulators::replace_located;
use crate::types::{
    AppliedReplacement, JsonSubstError, KeyPath, ReplacementMap, TransformOptions,
    TransformReport,
};

/// Applies every replacement to `json`, in replacement order.
///
/// Each raw value is coerced once, then written at its key path if that path exists. Paths
/// that do not resolve are skipped and leave no trace in the report. There is no rollback:
/// replacements that succeed stay applied whatever happens to the others.
pub fn transform_value(json: &mut Value, replacements: &ReplacementMap) -> TransformReport {
    let mut report = TransformReport::default();

    for (key, raw) in replacements.iter() {
        let value = coerce_value(Some(raw));
        let path = match key.parse::<KeyPath>() {
            Ok(path) => path,
            Err(err) => {
                debug!(key, %err, "skipping malformed key path");
                continue;
            }
        };

        match replace_located(json, &path, &value) {
            Some((location, written)) => {
                debug!(key, "replaced");
                report.replaced.push(AppliedReplacement {
                    key: key.to_string(),
                    location,
                    value: written,
                });
            }
            None => debug!(key, "key path not found"),
        }
    }

    report
}

/// Applies every replacement to `json` and returns the key paths that were replaced.
pub fn transform_object(json: &mut Value, replacements: &ReplacementMap) -> Vec<String> {
    transform_value(json, replacements).into_keys()
}

/// Parses a JSON document, transforms it and serializes the result.
pub fn transform_json_str(
    input: &str,
    replacements: &ReplacementMap,
    options: TransformOptions,
) -> Result<(String, TransformReport), JsonSubstError> {
    let mut json: Value = serde_json::from_str(input)?;
    let report = transform_value(&mut json, replacements);
    let output = String::from_utf8(to_json_bytes(&json, options.indent)?)?;
    Ok((output, report))
}

/// Reads the JSON document at `input`, transforms it and writes it to `output`.
///
/// `output` may be the same file as `input`. Nothing is written in dry-run mode.
pub fn transform_json_file(
    input: &Path,
    output: &Path,
    replacements: &ReplacementMap,
    options: TransformOptions,
) -> Result<TransformReport, JsonSubstError> {
    let content = fs::read_to_string(input).map_err(|source| JsonSubstError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let (transformed, report) =
        transform_json_str(&content, replacements, options).map_err(|err| match err {
            JsonSubstError::Json(source) => JsonSubstError::JsonFile {
                path: input.to_path_buf(),
                source,
            },
            other => other,
        })?;

    if !options.dry_run {
        fs::write(output, transformed).map_err(|source| JsonSubstError::Io {
            path: output.to_path_buf(),
            source,
        })?;
    }

    Ok(report)
}

/// The outcome of transforming one file with [`transform_files`].
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<TransformReport, JsonSubstError>,
}

/// Transforms each file in place, independently of the others.
///
/// A file that cannot be read, parsed or written is logged and reported, and the remaining
/// files are still processed. Reports come back in input order.
pub fn transform_files<P: AsRef<Path>>(
    files: &[P],
    replacements: &ReplacementMap,
    options: TransformOptions,
) -> Vec<FileReport> {
    files
        .iter()
        .map(|file| {
            let path = file.as_ref();
            info!(file = %path.display(), "Transforming file");

            let outcome = transform_json_file(path, path, replacements, options);
            match &outcome {
                Ok(report) if report.is_empty() => {
                    warn!(file = %path.display(), "No keys replaced in file");
                }
                Ok(report) => {
                    for key in report.keys() {
                        info!(file = %path.display(), key, "Replaced key");
                    }
                    info!(file = %path.display(), count = report.len(), "key(s) replaced in file");
                }
                Err(err) => error!(file = %path.display(), %err, "Error transforming file"),
            }

            FileReport {
                path: path.to_path_buf(),
                outcome,
            }
        })
        .collect()
}

fn to_json_bytes(json: &Value, indent: usize) -> Result<Vec<u8>, JsonSubstError> {
    if indent == 0 {
        return Ok(serde_json::to_vec(json)?);
    }

    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    json.serialize(&mut serializer)?;
    Ok(buf)
}
