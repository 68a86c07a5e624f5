//! XML processor collaborator.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use dawproject_model::fs::{require_file, require_file_within, write_atomic};
use dawproject_model::{DataError, Result, ValidationResult};

use crate::node::XmlNode;
use crate::tree::{parse_str, to_document_string};

/// Default size limit for documents read from disk (100 MiB).
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 100 * 1024 * 1024;

/// Loads, parses, saves and validates XML documents.
pub trait XmlProcessor: Send + Sync {
    /// Read and parse the document at `path`.
    fn load_document(&self, path: &Path) -> Result<XmlNode>;

    /// Parse XML text.
    fn parse_document(&self, content: &str) -> Result<XmlNode>;

    /// Write `document` to `path`. Returns the size of the written file.
    fn save_document(&self, document: &XmlNode, path: &Path) -> Result<usize>;

    /// Check that `path` holds a readable, well-formed XML document.
    fn validate_xml(&self, path: &Path) -> ValidationResult;

    /// Check `document` against the XML Schema at `schema_path`.
    fn validate_against_schema(&self, document: &XmlNode, schema_path: &Path) -> ValidationResult;
}

/// [`XmlProcessor`] backed by quick-xml.
#[derive(Debug, Clone)]
pub struct QuickXmlProcessor {
    max_document_size: u64,
}

impl Default for QuickXmlProcessor {
    fn default() -> Self {
        Self {
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

impl QuickXmlProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_document_size(mut self, bytes: u64) -> Self {
        self.max_document_size = bytes;
        self
    }

    pub fn max_document_size(&self) -> u64 {
        self.max_document_size
    }
}

impl XmlProcessor for QuickXmlProcessor {
    fn load_document(&self, path: &Path) -> Result<XmlNode> {
        let size = require_file_within(path, self.max_document_size)?;
        debug!(path = %path.display(), size, "loading XML document");
        let content = fs::read_to_string(path).map_err(|e| DataError::io("read", path, e))?;
        parse_str(&content).map_err(|e| e.loading(path))
    }

    fn parse_document(&self, content: &str) -> Result<XmlNode> {
        parse_str(content)
    }

    fn save_document(&self, document: &XmlNode, path: &Path) -> Result<usize> {
        if path.as_os_str().is_empty() {
            return Err(DataError::invalid_input("File path cannot be empty"));
        }
        if document.name.is_empty() {
            return Err(DataError::invalid_input("Document has no root element"));
        }
        let text = to_document_string(document)?;
        let size = write_atomic(path, text.as_bytes())?;
        info!(path = %path.display(), size, "saved XML document");
        Ok(size as usize)
    }

    fn validate_xml(&self, path: &Path) -> ValidationResult {
        let mut result = ValidationResult::new(path.display().to_string());
        let metadata = match require_file(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                result.add_error(e.to_string());
                return result;
            }
        };

        if metadata.len() == 0 {
            result.add_warning("File is empty");
            return result;
        }
        if metadata.len() > self.max_document_size {
            result.add_warning(format!(
                "File is very large ({} bytes); content was not checked",
                metadata.len()
            ));
            return result;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                result.add_error(format!("Cannot read file {}: {e}", path.display()));
                return result;
            }
        };

        let first_line = content.lines().find(|line| !line.trim().is_empty());
        if first_line.is_some_and(|line| !line.trim_start().starts_with('<')) {
            result.add_warning("File does not start with an XML tag");
        }
        if let Err(e) = parse_str(&content) {
            result.add_error(format!("Malformed XML: {e}"));
        }
        result
    }

    fn validate_against_schema(&self, document: &XmlNode, schema_path: &Path) -> ValidationResult {
        let mut result = ValidationResult::new(format!(
            "<{}> against {}",
            document.name,
            schema_path.display()
        ));
        if document.name.is_empty() {
            result.add_warning("Document has no root element");
        }
        if schema_path.as_os_str().is_empty() {
            result.add_warning("No schema given; schema validation skipped");
            return result;
        }

        let schema = match require_file(schema_path)
            .and_then(|_| {
                fs::read_to_string(schema_path).map_err(|e| DataError::io("read", schema_path, e))
            }) {
            Ok(schema) => schema,
            Err(e) => {
                result.add_error(e.to_string());
                return result;
            }
        };
        if schema.trim().is_empty() {
            result.add_error(format!("Schema file is empty: {}", schema_path.display()));
            return result;
        }

        let schema_root = match parse_str(&schema) {
            Ok(root) => root,
            Err(e) => {
                result.add_error(format!("Schema is not well-formed: {e}"));
                return result;
            }
        };
        if local_name(&schema_root.name) != "schema" {
            result.add_warning(format!(
                "Schema root is <{}>, not an XML Schema",
                schema_root.name
            ));
        }

        let declared: Vec<&str> = schema_root
            .children
            .iter()
            .filter(|child| local_name(&child.name) == "element")
            .filter_map(|child| child.attribute("name"))
            .collect();
        if !declared.is_empty()
            && !document.name.is_empty()
            && !declared.contains(&document.name.as_str())
        {
            result.add_error(format!(
                "Root element <{}> is not declared by the schema (expected one of: {})",
                document.name,
                declared.join(", ")
            ));
        }
        result
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}
