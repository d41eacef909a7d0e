//! Stepping through the matches of one search result.
//!
//! The cursor is either on no match or on exactly one index, so activating a
//! match always releases the previous one.

use crate::search::SearchMatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    NoMatch,
    At(usize),
}

impl Cursor {
    pub fn index(self) -> Option<usize> {
        match self {
            Cursor::NoMatch => None,
            Cursor::At(i) => Some(i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// Move the cursor over `len` matches, wrapping at both ends.
///
/// With no matches the cursor stays on [`Cursor::NoMatch`]. From `NoMatch`,
/// `Next` lands on the first match and `Previous` on the last.
pub fn step(len: usize, current: Cursor, direction: Direction) -> Cursor {
    if len == 0 {
        return Cursor::NoMatch;
    }
    let index = match (direction, current) {
        (Direction::Next, Cursor::NoMatch) => 0,
        (Direction::Next, Cursor::At(i)) => (i + 1) % len,
        (Direction::Previous, Cursor::At(i)) if i > 0 => (i - 1).min(len - 1),
        (Direction::Previous, _) => len - 1,
    };
    Cursor::At(index)
}

pub fn advance<T>(matches: &[T], current: Cursor, direction: Direction) -> Cursor {
    step(matches.len(), current, direction)
}

/// Holds the active match of one result set.
#[derive(Debug, Clone)]
pub struct MatchNavigator<'a> {
    matches: &'a [SearchMatch],
    cursor: Cursor,
}

impl<'a> MatchNavigator<'a> {
    pub fn new(matches: &'a [SearchMatch]) -> Self {
        Self { matches, cursor: Cursor::NoMatch }
    }

    pub fn next(&mut self) -> Cursor {
        self.cursor = advance(self.matches, self.cursor, Direction::Next);
        self.cursor
    }

    pub fn previous(&mut self) -> Cursor {
        self.cursor = advance(self.matches, self.cursor, Direction::Previous);
        self.cursor
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = Cursor::NoMatch;
    }

    pub fn active(&self) -> Option<&'a SearchMatch> {
        self.cursor.index().and_then(|i| self.matches.get(i))
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.cursor == Cursor::At(index)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// `"Match i of N"` with a 1-based `i` (0 before the first step).
    pub fn label(&self) -> String {
        if self.matches.is_empty() {
            return "No matches found".to_string();
        }
        let shown = self.cursor.index().map_or(0, |i| i + 1);
        format!("Match {shown} of {}", self.matches.len())
    }
}
