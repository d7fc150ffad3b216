//! Notebook cell model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::directive::Directive;

/// Kind of notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl CellType {
    /// All cell types, in schema order.
    pub const ALL: [Self; 3] = [Self::Code, Self::Markdown, Self::Raw];
}

/// One unit (code/markdown/raw block) of a notebook document.
///
/// The ipynb schema stores cell source as a list of lines with kept line
/// endings; it is collapsed to a single string on load and re-split on
/// write. Fields the pipeline does not interpret (`id`, `outputs`,
/// `execution_count`, ...) are round-tripped through `extra` untouched.
///
/// `directives` is populated once from the cell's original source when a
/// pipeline adopts the notebook (see
/// [`extract_directives`](crate::extract_directives)); later source
/// mutations do not re-derive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Position within the notebook, stable for the duration of a run.
    #[serde(skip)]
    pub index: usize,
    /// Cell kind.
    pub cell_type: CellType,
    /// Cell source as a single string.
    #[serde(with = "source_lines")]
    pub source: String,
    /// Opaque cell metadata, never interpreted.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Directives parsed from the leading comment lines.
    #[serde(skip)]
    directives: Vec<Directive>,
    /// Unknown schema fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Create a new cell with empty metadata.
    #[must_use]
    pub fn new(cell_type: CellType, source: impl Into<String>) -> Self {
        Self {
            index: 0,
            cell_type,
            source: source.into(),
            metadata: Map::new(),
            directives: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Replace the cell source with an ordered sequence of lines.
    ///
    /// Lines that do not already carry a trailing newline are joined with
    /// one (the last line is left as given).
    pub fn set_source<S: AsRef<str>>(&mut self, lines: &[S]) {
        let mut source = String::new();
        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            source.push_str(line);
            if i + 1 < lines.len() && !line.ends_with('\n') {
                source.push('\n');
            }
        }
        self.source = source;
    }

    /// Directives parsed from the cell's original source, in order of
    /// appearance.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Whether the cell's directive set intersects `candidates`.
    ///
    /// Case-sensitive exact name match, no wildcards. An empty candidate
    /// set never matches.
    #[must_use]
    pub fn has_directive(&self, candidates: &[&str]) -> bool {
        self.directives
            .iter()
            .any(|d| candidates.contains(&d.name.as_str()))
    }

    pub(crate) fn set_directives(&mut self, directives: Vec<Directive>) {
        self.directives = directives;
    }
}

/// Serde adapter between the ipynb line-list form and the joined string.
mod source_lines {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(source: &str, serializer: S) -> Result<S::Ok, S::Error> {
        let lines: Vec<&str> = source.split_inclusive('\n').collect();
        lines.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Source {
            Text(String),
            Lines(Vec<String>),
        }

        Ok(match Source::deserialize(deserializer)? {
            Source::Text(text) => text,
            Source::Lines(lines) => lines.concat(),
        })
    }
}
