//! Diagnostics sink backing the admin endpoints.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::filter::{Diagnostics, FilterSnapshot};

const DUMP_HEADING: &str = "Current Referrer Filter Allowed Referrers:";

/// Holds the most recently published snapshot until the filter withdraws it.
pub struct DiagnosticsBoard {
    current: ArcSwapOption<FilterSnapshot>,
}

impl DiagnosticsBoard {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// `None` before the first publish and after withdrawal.
    pub fn snapshot(&self) -> Option<Arc<FilterSnapshot>> {
        self.current.load_full()
    }
}

impl Default for DiagnosticsBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics for DiagnosticsBoard {
    fn publish(&self, snapshot: &Arc<FilterSnapshot>) {
        self.current.store(Some(Arc::clone(snapshot)));
    }

    fn withdraw(&self) {
        self.current.store(None);
    }
}

/// Plain-text dump: heading, blank line, then every exact origin followed by
/// every pattern, one per line.
pub fn render_text(snapshot: &FilterSnapshot) -> String {
    let allow_list = snapshot.allow_list();
    let mut out = format!("{DUMP_HEADING}\n\n");
    for origin in allow_list.origins() {
        out.push_str(&origin.canonical());
        out.push('\n');
    }
    for pattern in allow_list.patterns() {
        out.push_str(pattern.as_str());
        out.push('\n');
    }
    out
}
