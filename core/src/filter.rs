//! Read-only projections over the store: status filter plus search.

use std::fmt;
use std::str::FromStr;

use crate::types::Todo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => todo.completed,
            StatusFilter::Incomplete => !todo.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::Incomplete => "incomplete",
        })
    }
}

/// Unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter '{0}' (expected all, completed or incomplete)")]
pub struct ParseStatusFilterError(pub String);

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "incomplete" => Ok(StatusFilter::Incomplete),
            _ => Err(ParseStatusFilterError(s.to_string())),
        }
    }
}

/// Active filter and search string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub status: StatusFilter,
    pub search: String,
}

impl TodoQuery {
    /// Case-insensitive substring match on the text. A blank search matches
    /// everything; otherwise the search is used as typed, surrounding spaces
    /// included.
    pub fn matches(&self, todo: &Todo) -> bool {
        if !self.status.matches(todo) {
            return false;
        }
        if self.search.trim().is_empty() {
            return true;
        }
        todo.text.to_lowercase().contains(&self.search.to_lowercase())
    }

    /// Matching todos, in store order.
    pub fn apply<'a>(&self, todos: &'a [Todo]) -> Vec<&'a Todo> {
        todos.iter().filter(|t| self.matches(t)).collect()
    }
}
