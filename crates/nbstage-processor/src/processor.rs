//! The per-cell processor contract.

use nbstage_notebook::{Cell, CellType, Notebook};

use crate::context::CellContext;
use crate::error::ProcessorError;

/// A per-cell mutation unit, gated by directive membership and cell type.
///
/// A processor instance is constructed once per pipeline run and invoked
/// once per eligible cell, in document order. It is not isolated between
/// cells: it may accumulate state across its own invocations within one
/// run (the [`begin`](Self::begin)/[`end`](Self::end) hooks bracket the
/// sweep for setup and cross-cell flushes).
///
/// Implementations only provide [`process`](Self::process); the dispatch
/// wrapper [`process_cell`](Self::process_cell) is the single enforcement
/// point for eligibility, so `process` may assume the cell carries one of
/// the declared directives and has an applicable type.
pub trait Processor {
    /// Name used in configuration and error reporting.
    fn name(&self) -> &str;

    /// Directive names this processor acts on.
    ///
    /// An empty set is an explicit opt-out: the processor never matches.
    fn directives(&self) -> &[&str];

    /// Cell types this processor may act on (default: all).
    fn cell_types(&self) -> &[CellType] {
        &CellType::ALL
    }

    /// Called once before the cell sweep.
    fn begin(&mut self, _notebook: &Notebook) {}

    /// Called once after the cell sweep. Receives the notebook mutably
    /// for processors that must flush accumulated cross-cell edits.
    fn end(&mut self, _notebook: &mut Notebook) {}

    /// Whether the cell's directive set intersects this processor's.
    fn has_directives(&self, cell: &Cell) -> bool {
        cell.has_directive(self.directives())
    }

    /// The processor-specific mutation logic.
    ///
    /// Eligibility already holds when called through
    /// [`process_cell`](Self::process_cell); calling `process` directly
    /// bypasses gating and is an internal detail processor authors should
    /// not rely on.
    fn process(&mut self, cell: &mut Cell, ctx: &CellContext) -> Result<(), ProcessorError>;

    /// Dispatch wrapper: invokes [`process`](Self::process) iff the cell
    /// type is applicable and a declared directive is present, otherwise
    /// a no-op. Should not be overridden.
    fn process_cell(&mut self, cell: &mut Cell, ctx: &CellContext) -> Result<(), ProcessorError> {
        if !self.cell_types().contains(&cell.cell_type) {
            return Ok(());
        }
        if !self.has_directives(cell) {
            return Ok(());
        }
        self.process(cell, ctx)
    }
}

impl std::fmt::Debug for dyn Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
