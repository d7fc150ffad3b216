//! Notebook document model and ipynb round-trip.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cell::{Cell, CellType};
use crate::error::NotebookError;

/// Default notebook format version pair for new notebooks.
const DEFAULT_FORMAT: (u32, u32) = (4, 5);

/// An ordered collection of cells plus document-level metadata.
///
/// The cell order reflects document position and is never reordered here;
/// callers mutate cells by append or replace only. Format versions and
/// unknown fields are preserved verbatim, so a notebook loaded and
/// written back with no processing is content-identical to the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    pub cells: Vec<Cell>,
    /// Opaque document metadata (kernelspec, language info, ...).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Major format version, preserved on write exactly as read.
    pub nbformat: u32,
    /// Minor format version, preserved on write exactly as read.
    pub nbformat_minor: u32,
    /// Unknown schema fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Create a new notebook with the default format version (4, 5).
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut notebook = Self {
            cells,
            metadata: Map::new(),
            nbformat: DEFAULT_FORMAT.0,
            nbformat_minor: DEFAULT_FORMAT.1,
            extra: Map::new(),
        };
        notebook.reindex();
        notebook
    }

    /// Read a notebook from a file.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Io`] if the file cannot be read and
    /// [`NotebookError::Format`] if it is not a valid notebook document.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, NotebookError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a notebook from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Format`] for malformed JSON or missing
    /// required fields; no partial notebook is returned.
    pub fn from_json(content: &str) -> Result<Self, NotebookError> {
        let mut notebook: Self = serde_json::from_str(content)?;
        notebook.reindex();
        Ok(notebook)
    }

    /// Write the notebook to a file as ipynb JSON.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Io`] if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), NotebookError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize the notebook to ipynb JSON with sorted keys and a
    /// trailing newline.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serialization of an in-memory notebook cannot fail.
        let mut json = serde_json::to_string_pretty(self).unwrap_or_default();
        json.push('\n');
        json
    }

    /// The kernel language, from `metadata.kernelspec.language`.
    ///
    /// Defaults to `python` when the metadata is absent.
    #[must_use]
    pub fn language(&self) -> &str {
        self.metadata
            .get("kernelspec")
            .and_then(|spec| spec.get("language"))
            .and_then(Value::as_str)
            .unwrap_or("python")
    }

    /// Borrow the cell at `index`, if present.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Reassign cell indexes to match document order.
    pub fn reindex(&mut self) {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.index = i;
        }
    }
}

/// Make a blank cell of the given type.
///
/// Convenience constructor mirroring [`Cell::new`], kept for building
/// notebooks in tests and embedding code.
#[must_use]
pub fn make_cell(source: impl Into<String>, cell_type: CellType) -> Cell {
    Cell::new(cell_type, source)
}
