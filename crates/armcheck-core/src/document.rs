// crates/armcheck-core/src/document.rs
// ============================================================================
// Module: Template Documents
// Description: Read-only ARM template and parameters documents.
// Purpose: Load JSON documents from disk with size limits and shape guards.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Template and parameters documents are owned by the template authors; this
//! crate only reads them. Loading enforces a hard byte limit before parsing
//! and requires the document root to be a JSON object. Everything beyond that
//! is left to the checks in [`crate::checks`], so a malformed document still
//! produces a full report instead of a single load error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum size of a template or parameters document, in bytes.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be opened or read.
    #[error("unable to read {path}: {message}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },
    /// The file exceeds the configured size limit.
    #[error("{path} exceeds size limit of {limit} bytes")]
    TooLarge {
        /// Path that failed to load.
        path: String,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// The file is not valid JSON.
    #[error("invalid json in {path}: {message}")]
    Parse {
        /// Path that failed to load.
        path: String,
        /// Parser error text.
        message: String,
    },
    /// The JSON root is not an object.
    #[error("{path} must contain a json object at the root")]
    NotObject {
        /// Path that failed to load.
        path: String,
    },
}

// ============================================================================
// SECTION: Template Document
// ============================================================================

/// An ARM deployment template.
///
/// # Invariants
/// - The root value is always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    /// Root object of the template.
    root: Map<String, Value>,
}

impl TemplateDocument {
    /// Loads a template from disk, rejecting files larger than `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the file cannot be read, is too large,
    /// is not JSON, or does not hold an object.
    pub fn load(path: &Path, max_bytes: usize) -> Result<Self, DocumentError> {
        let root = load_object(path, max_bytes)?;
        Ok(Self {
            root,
        })
    }

    /// Wraps an already-parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotObject`] when `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(root) => Ok(Self {
                root,
            }),
            _ => Err(DocumentError::NotObject {
                path: "<inline>".to_string(),
            }),
        }
    }

    /// Returns a top-level member when present and not null.
    #[must_use]
    pub fn member(&self, key: &str) -> Option<&Value> {
        non_null(self.root.get(key))
    }

    /// Returns the declared parameter names in document order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        self.member("parameters")
            .and_then(Value::as_object)
            .map(|params| params.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the resource objects, or an empty slice when absent.
    #[must_use]
    pub fn resources(&self) -> &[Value] {
        self.member("resources").and_then(Value::as_array).map_or(&[], Vec::as_slice)
    }

    /// Returns the `type` of every resource that declares one.
    #[must_use]
    pub fn resource_types(&self) -> Vec<&str> {
        self.resources()
            .iter()
            .filter_map(|resource| resource.get("type").and_then(Value::as_str))
            .collect()
    }

    /// Returns the first resource whose `type` equals `resource_type`.
    #[must_use]
    pub fn find_resource(&self, resource_type: &str) -> Option<&Value> {
        self.resources().iter().find(|resource| {
            resource.get("type").and_then(Value::as_str) == Some(resource_type)
        })
    }

    /// Returns the declared output entry for `name` when present and not null.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.member("outputs").and_then(|outputs| non_null(outputs.get(name)))
    }

    /// Returns the raw root object.
    #[must_use]
    pub const fn as_object(&self) -> &Map<String, Value> {
        &self.root
    }
}

// ============================================================================
// SECTION: Parameters Document
// ============================================================================

/// An ARM deployment parameters file.
///
/// # Invariants
/// - The root value is always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersDocument {
    /// Root object of the parameters file.
    root: Map<String, Value>,
}

impl ParametersDocument {
    /// Loads a parameters file from disk, rejecting files larger than `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the file cannot be read, is too large,
    /// is not JSON, or does not hold an object.
    pub fn load(path: &Path, max_bytes: usize) -> Result<Self, DocumentError> {
        let root = load_object(path, max_bytes)?;
        Ok(Self {
            root,
        })
    }

    /// Wraps an already-parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotObject`] when `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(root) => Ok(Self {
                root,
            }),
            _ => Err(DocumentError::NotObject {
                path: "<inline>".to_string(),
            }),
        }
    }

    /// Returns a top-level member when present and not null.
    #[must_use]
    pub fn member(&self, key: &str) -> Option<&Value> {
        non_null(self.root.get(key))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Filters out JSON `null`.
pub(crate) fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

/// Reads and parses a JSON object while enforcing a byte limit.
fn load_object(path: &Path, max_bytes: usize) -> Result<Map<String, Value>, DocumentError> {
    let display = path.display().to_string();
    let bytes = read_file_limited(path, max_bytes)?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|err| DocumentError::Parse {
        path: display.clone(),
        message: err.to_string(),
    })?;
    match value {
        Value::Object(root) => Ok(root),
        _ => Err(DocumentError::NotObject {
            path: display,
        }),
    }
}

/// Reads a file, failing once more than `max_bytes` have been read.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, DocumentError> {
    let io_error = |err: std::io::Error| DocumentError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let file = File::open(path).map_err(io_error)?;
    let limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(io_error)?;
    if buf.len() > max_bytes {
        return Err(DocumentError::TooLarge {
            path: path.display().to_string(),
            limit: max_bytes,
        });
    }
    Ok(buf)
}
