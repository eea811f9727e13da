//! Back/forward navigation history.
//!
//! Each entry is a [`Snapshot`] of the view: where the reader was, what was
//! highlighted, and enough of the active search to carry on from the same
//! occurrence.

use serde::{Deserialize, Serialize};

use crate::bible::position::Position;
use crate::services::navigator::Cursor;
use crate::services::offsets::DisplaySpan;
use crate::services::search::SearchRequest;

/// Everything needed to put the view back as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Verse shown.
    pub position: Position,

    /// Character offset of the highlighted match, if any.
    #[serde(default)]
    pub offset: Option<usize>,

    /// Highlight in the display text.
    #[serde(default)]
    pub highlight: Option<DisplaySpan>,

    /// Matches visited so far.
    #[serde(default)]
    pub occurrence: usize,

    /// Matches in the active search.
    #[serde(default)]
    pub total: usize,

    /// The active search, if one was running.
    #[serde(default)]
    pub search: Option<SearchRequest>,

    /// Where that search would continue from.
    #[serde(default)]
    pub cursor: Option<Cursor>,

    /// Whether the find panel was open.
    #[serde(default)]
    pub find_open: bool,
}

impl Snapshot {
    /// A plain view of `position` with no search.
    pub fn at(position: Position) -> Self {
        Self { position, ..Self::default() }
    }

    /// Whether a search was active.
    pub const fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    fn same_place(&self, other: &Self) -> bool {
        self.position == other.position && self.offset == other.offset
    }
}

/// The back and forward stacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    back: Vec<Snapshot>,
    forward: Vec<Snapshot>,
}

impl History {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self { back: Vec::new(), forward: Vec::new() }
    }

    /// Record a snapshot on the back stack, unless it repeats the top entry.
    pub fn push_back(&mut self, snapshot: Snapshot) {
        push_distinct(&mut self.back, snapshot, "back");
    }

    /// Take the most recent back entry.
    pub fn pop_back(&mut self) -> Option<Snapshot> {
        self.back.pop()
    }

    /// Record a snapshot on the forward stack, unless it repeats the top entry.
    pub fn push_forward(&mut self, snapshot: Snapshot) {
        push_distinct(&mut self.forward, snapshot, "forward");
    }

    /// Take the most recent forward entry.
    pub fn pop_forward(&mut self) -> Option<Snapshot> {
        self.forward.pop()
    }

    /// Forget everything ahead of the current view.
    pub fn clear_forward(&mut self) {
        if !self.forward.is_empty() {
            tracing::debug!("Discarding {} forward entries", self.forward.len());
        }
        self.forward.clear();
    }

    /// Move every forward entry onto the back stack, newest first.
    pub fn merge_forward(&mut self) {
        tracing::debug!("Merging {} forward entries into back history", self.forward.len());
        while let Some(snapshot) = self.forward.pop() {
            self.back.push(snapshot);
        }
    }

    /// Entries on the back stack.
    pub fn back_len(&self) -> usize {
        self.back.len()
    }

    /// Entries on the forward stack.
    pub fn forward_len(&self) -> usize {
        self.forward.len()
    }

    /// The most recent back entry.
    pub fn peek_back(&self) -> Option<&Snapshot> {
        self.back.last()
    }

    /// The most recent forward entry.
    pub fn peek_forward(&self) -> Option<&Snapshot> {
        self.forward.last()
    }
}

fn push_distinct(stack: &mut Vec<Snapshot>, snapshot: Snapshot, name: &str) {
    if stack.last().is_some_and(|top| top.same_place(&snapshot)) {
        tracing::debug!("Skipping duplicate {} entry at {}", name, snapshot.position);
        return;
    }
    tracing::debug!("Pushing {} entry at {}", name, snapshot.position);
    stack.push(snapshot);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn at(index: usize) -> Snapshot {
        Snapshot::at(Position::new(index))
    }

    #[test]
    fn test_push_back_skips_duplicates() {
        let mut history = History::new();
        history.push_back(at(1));
        history.push_back(at(1));
        assert_eq!(history.back_len(), 1);

        let mut highlighted = at(1);
        highlighted.offset = Some(4);
        history.push_back(highlighted);
        assert_eq!(history.back_len(), 2);

        history.push_back(at(1));
        assert_eq!(history.back_len(), 3);
    }

    #[test]
    fn test_push_forward_skips_duplicates() {
        let mut history = History::new();
        history.push_forward(at(2));
        history.push_forward(at(2));
        assert_eq!(history.forward_len(), 1);
        assert_eq!(history.pop_forward(), Some(at(2)));
        assert_eq!(history.pop_forward(), None);
    }

    #[test]
    fn test_stacks_are_last_in_first_out() {
        let mut history = History::new();
        history.push_back(at(1));
        history.push_back(at(2));
        assert_eq!(history.pop_back().map(|s| s.position.index()), Some(2));
        assert_eq!(history.pop_back().map(|s| s.position.index()), Some(1));
        assert!(history.pop_back().is_none());
    }

    #[test]
    fn test_merge_forward_moves_newest_first() {
        let mut history = History::new();
        history.push_back(at(1));
        history.push_forward(at(5));
        history.push_forward(at(4));
        history.merge_forward();

        assert_eq!(history.forward_len(), 0);
        let order: Vec<usize> = std::iter::from_fn(|| history.pop_back()).map(|s| s.position.index()).collect();
        assert_eq!(order, [5, 4, 1]);
    }

    #[test]
    fn test_clear_forward() {
        let mut history = History::new();
        history.push_forward(at(3));
        history.clear_forward();
        assert!(history.peek_forward().is_none());
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut snapshot = at(7);
        snapshot.highlight = Some(DisplaySpan { start: 2, len: 4 });
        snapshot.cursor = Some(Cursor::default());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);

        let minimal: Snapshot = serde_json::from_str(r#"{"position": 3}"#).unwrap();
        assert_eq!(minimal, at(3));
    }
}
