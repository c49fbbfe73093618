//! Id generation scoped to a single net or layout.

use rustc_hash::FxHashMap as HashMap;

/// Hands out `"{prefix}{n}"` ids, skipping any id the owner reports as taken.
///
/// Each `Net` and each `Layout` owns its own generator, so independent runs never share
/// counters.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: HashMap<String, usize>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_free(&mut self, prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
        let counter = self.next.entry(prefix.to_string()).or_insert(0);
        loop {
            let candidate = format!("{prefix}{counter}");
            *counter += 1;
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}
