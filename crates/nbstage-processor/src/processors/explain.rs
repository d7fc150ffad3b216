//! Code-and-explanation tabsets.
//!
//! Rewrites a code cell marked `#| explain` together with the markdown
//! cell immediately following it into a Quarto panel-tabset: one tab with
//! the bare code, one with the code plus the prose explanation.
//!
//! The pair is rewritten in place: the code cell becomes the tabset and
//! the consumed explanation cell is blanked at the end of the sweep. The
//! notebook's cell order is never changed.

use nbstage_notebook::{Cell, CellType, Notebook};

use crate::context::CellContext;
use crate::error::ProcessorError;
use crate::processor::Processor;
use crate::registry::ProcessorArgs;

const DEFAULT_CODE_TAB: &str = "Code";
const DEFAULT_EXPLAIN_TAB: &str = "Code & Explanation";

/// Reorganizes `#| explain` code cells and their following markdown
/// explanation into a panel tabset.
#[derive(Debug, Clone)]
pub struct ExplainProcessor {
    code_tab: String,
    explain_tab: String,
    /// Indexes of explanation cells to blank once the sweep finishes.
    consumed: Vec<usize>,
}

impl Default for ExplainProcessor {
    fn default() -> Self {
        Self {
            code_tab: DEFAULT_CODE_TAB.to_owned(),
            explain_tab: DEFAULT_EXPLAIN_TAB.to_owned(),
            consumed: Vec::new(),
        }
    }
}

impl ExplainProcessor {
    /// Construct from configured arguments.
    ///
    /// Accepts optional `code_tab` / `explain_tab` string arguments for
    /// the tab titles.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::InvalidArgs`] when a title argument is
    /// present but not a string.
    pub fn from_args(args: &ProcessorArgs) -> Result<Self, ProcessorError> {
        let mut processor = Self::default();
        if let Some(value) = args.get("code_tab") {
            processor.code_tab = string_arg(value, "code_tab")?;
        }
        if let Some(value) = args.get("explain_tab") {
            processor.explain_tab = string_arg(value, "explain_tab")?;
        }
        Ok(processor)
    }

    fn tabset(&self, code: &str, explanation: &str, language: &str) -> String {
        format!(
            "::: {{.panel-tabset}}\n\n\
             ## {code_tab}\n\n\
             ```{{{language}}}\n{code}\n```\n\n\
             ## {explain_tab}\n\n\
             ```{{{language}}}\n{code}\n```\n\n\
             {explanation}\n\n\
             :::\n",
            code_tab = self.code_tab,
            explain_tab = self.explain_tab,
        )
    }
}

fn string_arg(value: &serde_json::Value, name: &str) -> Result<String, ProcessorError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ProcessorError::InvalidArgs(format!("`{name}` must be a string")))
}

impl Processor for ExplainProcessor {
    fn name(&self) -> &str {
        "explain"
    }

    fn directives(&self) -> &[&str] {
        &["explain"]
    }

    fn cell_types(&self) -> &[CellType] {
        &[CellType::Code]
    }

    fn begin(&mut self, _notebook: &Notebook) {
        self.consumed.clear();
    }

    fn process(&mut self, cell: &mut Cell, ctx: &CellContext) -> Result<(), ProcessorError> {
        let explanation = match ctx.next {
            Some(next) if next.cell_type == CellType::Markdown && !next.source.trim().is_empty() => {
                next.source.trim().to_owned()
            }
            _ => {
                tracing::warn!(
                    cell = ctx.index,
                    "explain directive without a following markdown explanation"
                );
                return Ok(());
            }
        };

        let code = cell.source.trim_end_matches('\n').to_owned();
        cell.source = self.tabset(&code, &explanation, ctx.language);
        cell.cell_type = CellType::Markdown;
        self.consumed.push(ctx.index + 1);
        Ok(())
    }

    fn end(&mut self, notebook: &mut Notebook) {
        for &index in &self.consumed {
            if let Some(cell) = notebook.cells.get_mut(index) {
                cell.source.clear();
            }
        }
        self.consumed.clear();
    }
}
