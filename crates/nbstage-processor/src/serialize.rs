//! Serialization of a processed notebook to document text.
//!
//! The exact rendering of each cell kind is a collaborator concern; the
//! pipeline only guarantees the serializer receives cells in original
//! order with all mutations applied. [`QuartoSerializer`] is the default
//! backend, producing Quarto-flavored markdown (`.qmd`).

use nbstage_notebook::{CellType, Notebook};

/// Converts a notebook to the target document text format.
pub trait Serializer {
    /// Serialize `notebook`, walking cells in document order.
    fn serialize(&self, notebook: &Notebook) -> String;
}

/// Default serializer producing Quarto-flavored markdown.
///
/// Markdown and raw cells are emitted verbatim; code cells are fenced
/// with the notebook's kernel language. Cells whose source is empty
/// (e.g. blanked by a processor) are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuartoSerializer;

impl Serializer for QuartoSerializer {
    fn serialize(&self, notebook: &Notebook) -> String {
        let language = notebook.language();
        let mut output = String::new();

        for cell in &notebook.cells {
            if cell.source.trim().is_empty() {
                continue;
            }
            if !output.is_empty() {
                output.push('\n');
            }

            match cell.cell_type {
                CellType::Markdown | CellType::Raw => {
                    output.push_str(cell.source.trim_end_matches('\n'));
                }
                CellType::Code => {
                    output.push_str(&format!(
                        "```{{{language}}}\n{}\n```",
                        cell.source.trim_end_matches('\n')
                    ));
                }
            }
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use nbstage_notebook::make_cell;

    #[test]
    fn test_cells_rendered_in_order() {
        let notebook = Notebook::new(vec![
            make_cell("# Title\n", CellType::Markdown),
            make_cell("x = 1\n", CellType::Code),
            make_cell("tail\n", CellType::Raw),
        ]);

        let output = QuartoSerializer.serialize(&notebook);
        assert_eq!(output, "# Title\n\n```{python}\nx = 1\n```\n\ntail\n");
    }

    #[test]
    fn test_code_fence_uses_kernel_language() {
        let mut notebook = Notebook::new(vec![make_cell("x <- 1\n", CellType::Code)]);
        notebook.metadata.insert(
            "kernelspec".to_owned(),
            serde_json::json!({"language": "r", "name": "ir"}),
        );

        let output = QuartoSerializer.serialize(&notebook);
        assert_eq!(output, "```{r}\nx <- 1\n```\n");
    }

    #[test]
    fn test_empty_cells_skipped() {
        let notebook = Notebook::new(vec![
            make_cell("# Title\n", CellType::Markdown),
            make_cell("", CellType::Markdown),
            make_cell("x = 1\n", CellType::Code),
        ]);

        let output = QuartoSerializer.serialize(&notebook);
        assert_eq!(output, "# Title\n\n```{python}\nx = 1\n```\n");
    }
}
