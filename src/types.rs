use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use json_patch::{Patch, PatchOperation, ReplaceOperation};
use jsonptr::{PointerBuf, Token};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::parse::{parse_key_path, parse_replacements};
use crate::transform::transform_value;

/// A dotted key path, split into its unescaped segments.
///
/// Segments are separated by `.`. A backslash escapes the following character, so `a\.b`
/// is the single segment `a.b` and `a\\b` is the single segment `a\b`.
///
/// ## Example
///
/// ```rust
/// use jsonsubst::KeyPath;
///
/// let path: KeyPath = r"servers.0.host\.name".parse().unwrap();
/// assert_eq!(path.segments(), ["servers", "0", "host.name"]);
/// assert_eq!(path.to_string(), r"servers.0.host\.name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl FromStr for KeyPath {
    type Err = JsonSubstError;

    /// Parses a key path. Empty paths and paths with empty segments (`a..b`, `.a`, `a.`) are rejected.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_key_path(input)
    }
}

impl KeyPath {
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        KeyPath { segments }
    }

    /// Returns the unescaped segments of the path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for c in segment.chars() {
                if c == '.' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// A concrete step into a JSON document, as resolved against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PathToken {
    Key(String),
    Index(usize),
}

/// An ordered `key path -> raw value` list, as parsed from `key=value` lines.
///
/// Keys keep the escape sequences they were written with. Inserting an existing key replaces
/// its value but keeps its original position, so iteration order is first-seen order.
/// Equality compares contents, not order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    entries: IndexMap<String, String>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses newline separated `key=value` lines.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use jsonsubst::ReplacementMap;
    ///
    /// let replacements = ReplacementMap::parse("db.url = postgres://h/db?a=b\n\n = orphan\nflag");
    /// assert_eq!(replacements.get("db.url"), Some("postgres://h/db?a=b"));
    /// assert_eq!(replacements.get("flag"), Some(""));
    /// assert_eq!(replacements.len(), 2);
    /// ```
    pub fn parse(input: &str) -> Self {
        parse_replacements(input)
    }

    /// Inserts a replacement, returning the previous raw value for `key` if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies every replacement to `json` in order. See [`transform_value`].
    pub fn apply_to(&self, json: &mut Value) -> TransformReport {
        transform_value(json, self)
    }
}

impl FromStr for ReplacementMap {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(parse_replacements(input))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut replacements = ReplacementMap::new();
        for (key, value) in iter {
            replacements.insert(key, value);
        }
        replacements
    }
}

impl fmt::Display for ReplacementMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// A replacement that found its target and was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedReplacement {
    /// The key path exactly as it appeared in the replacement list.
    pub key: String,
    /// Where the value was written. This can be shorter than the key path when a scalar
    /// was found before the path ran out.
    pub location: Vec<PathToken>,
    /// The value stored, after string preservation.
    pub value: Value,
}

impl AppliedReplacement {
    /// The written location as a JSON Pointer.
    pub fn pointer(&self) -> PointerBuf {
        PointerBuf::from_tokens(self.location.iter().map(|token| match token {
            PathToken::Key(key) => Token::new(key.as_str()),
            PathToken::Index(index) => Token::new(index.to_string()),
        }))
    }
}

/// The outcome of transforming one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformReport {
    pub replaced: Vec<AppliedReplacement>,
}

impl TransformReport {
    /// The applied key paths, in replacement order.
    pub fn keys(&self) -> Vec<&str> {
        self.replaced.iter().map(|r| r.key.as_str()).collect()
    }

    pub fn into_keys(self) -> Vec<String> {
        self.replaced.into_iter().map(|r| r.key).collect()
    }

    pub fn len(&self) -> usize {
        self.replaced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty()
    }

    /// Renders the applied replacements as an RFC 6902 patch of `replace` operations.
    ///
    /// Applying the patch to the untransformed document reproduces the transformed one.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use jsonsubst::{transform_value, ReplacementMap};
    /// use serde_json::json;
    ///
    /// let original = json!({"app": {"version": "1.0", "port": 80}});
    /// let replacements = ReplacementMap::parse("app.version=2.0\napp.port=8080");
    ///
    /// let mut transformed = original.clone();
    /// let report = transform_value(&mut transformed, &replacements);
    ///
    /// let mut replayed = original;
    /// json_patch::patch(&mut replayed, &report.to_patch()).unwrap();
    /// assert_eq!(replayed, transformed);
    /// ```
    pub fn to_patch(&self) -> Patch {
        Patch(
            self.replaced
                .iter()
                .map(|r| {
                    PatchOperation::Replace(ReplaceOperation {
                        path: r.pointer(),
                        value: r.value.clone(),
                    })
                })
                .collect(),
        )
    }
}

/// Output settings for the document and file wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Spaces per indentation level. Zero writes compact JSON.
    pub indent: usize,
    /// Compute the report without writing any output file.
    pub dry_run: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            indent: 2,
            dry_run: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonSubstError {
    #[error("Parsing error: {0}")]
    NomError(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON in {}: {source}", path.display())]
    JsonFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialized document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
