//! Context windows around a matched line
//!
//! Windows are cut from the current poll's batch only. Lines consumed in an
//! earlier poll are gone, so a rule asking for five lines of leading context
//! gets fewer when the batch is short.

/// Lines around a match, both in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextWindow {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// Build the window for the line at `index` in `batch`
pub fn assemble(batch: &[String], index: usize, before: usize, after: usize) -> ContextWindow {
    if index >= batch.len() {
        return ContextWindow::default();
    }

    let start = index.saturating_sub(before);
    let end = batch.len().min(index.saturating_add(1).saturating_add(after));

    ContextWindow {
        before: batch[start..index].to_vec(),
        after: batch[index + 1..end].to_vec(),
    }
}
