//! # jsonsubst
//!
//! A Rust library to replace values inside JSON documents, addressed by dotted key paths and
//! driven by a flat `key=value` replacement list.
//!
//! It is meant for build and deploy pipelines that patch configuration files before shipping
//! them: the values change, the shape of the document never does.
//!
//! ## Features
//!
//! - **Nested Objects and Arrays:** `server.listeners.0.port=8443` walks objects by key and arrays by index.
//! - **Escaped Dots:** `logging.level\.root=warn` addresses the single key `level.root`.
//! - **Typed Values:** Replacement values become `null`, booleans, numbers or strings. A field that
//!   was a string stays a string, so `version=2` keeps `"version": "2"` quoted.
//! - **No Structure Creation:** Paths that do not exist in the document are skipped, never created.
//! - **Reports:** Every transform reports which keys were replaced, and can render the change set as an
//!   RFC 6902 JSON Patch.
//!
//! ## Examples
//!
//! ### Basic usage:
//!
//! ```rust
//! use jsonsubst::{transform_value, ReplacementMap};
//! use serde_json::json;
//!
//! let mut config = json!({
//!     "name": "api",
//!     "version": "1",
//!     "server": {
//!         "port": 80,
//!         "hosts": ["localhost", "127.0.0.1"]
//!     }
//! });
//!
//! let replacements = ReplacementMap::parse(
//!     "server.port = 8080\n\
//!      server.hosts.0 = api.internal\n\
//!      version = 2\n\
//!      server.tls = true",
//! );
//! let report = transform_value(&mut config, &replacements);
//!
//! assert_eq!(config, json!({
//!     "name": "api",
//!     "version": "2",
//!     "server": {
//!         "port": 8080,
//!         "hosts": ["api.internal", "127.0.0.1"]
//!     }
//! }));
//! // `server.tls` does not exist, so it was skipped.
//! assert_eq!(report.keys(), ["server.port", "server.hosts.0", "version"]);
//! ```
//!
//! ### Keys containing dots
//!
//! ```rust
//! use jsonsubst::replace_value;
//! use serde_json::json;
//!
//! let mut config = json!({"spring.profiles": "dev", "spring": {"profiles": "unused"}});
//!
//! assert!(replace_value(&mut config, r"spring\.profiles", &json!("prod")));
//! assert_eq!(config, json!({"spring.profiles": "prod", "spring": {"profiles": "unused"}}));
//! ```
//!
//! ### Transforming files
//!
//! ```rust,no_run
//! use jsonsubst::{transform_files, ReplacementMap, TransformOptions};
//!
//! let replacements = ReplacementMap::parse("ConnectionStrings.Default=Server=db;Database=app");
//! for file in transform_files(&["appsettings.json"], &replacements, TransformOptions::default()) {
//!     if let Err(err) = file.outcome {
//!         eprintln!("{}: {err}", file.path.display());
//!     }
//! }
//! ```
//!
//! ## Known limitations
//!
//! Numerals with more precision than an `f64` holds are accepted and rounded: integers beyond 2^53
//! come out rounded (`9007199254740993` is written as `9007199254740992`), in numeric and string
//! fields alike.
//!
//! Only decimal numerals are numbers. Hex, octal and binary literals such as `0x10`, and `Infinity`,
//! are written as strings rather than converted.

mod coerce;
mod manipulators;
mod parse;
mod transform;
mod types;

pub use coerce::{coerce_value, display_value};
pub use manipulators::replace_value;
pub use parse::{parse_key_path, parse_replacements};
pub use transform::{
    transform_files, transform_json_file, transform_json_str, transform_object, transform_value,
    FileReport,
};
pub use types::{
    AppliedReplacement, JsonSubstError, KeyPath, PathToken, ReplacementMap, TransformOptions,
    TransformReport,
};
