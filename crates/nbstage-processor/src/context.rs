//! Per-cell dispatch context.

use nbstage_notebook::Cell;

/// Context handed to a processor for one cell.
///
/// Cross-cell lookahead is an explicit one-cell window: `next` borrows
/// the cell immediately following the one being processed, already
/// carrying any mutations from earlier pipeline steps. There is no
/// implicit shared scan state.
#[derive(Debug)]
pub struct CellContext<'a> {
    /// Index of the cell being processed.
    pub index: usize,
    /// Kernel language of the notebook (e.g. `python`).
    pub language: &'a str,
    /// The immediately following cell, if any.
    pub next: Option<&'a Cell>,
}
