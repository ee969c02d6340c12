use chrono::Utc;
use serde::{Deserialize, Serialize};

pub mod local;
pub mod remote;

pub use local::{FileStorage, LocalStore, StoreError};
#[cfg(test)]
pub use local::MemoryStorage;
pub use remote::{ApiError, CommentApi, HttpApi};

/// A comment attached to a line of code.
///
/// Comments that came from the server carry non-negative ids assigned by the
/// backend. Comments that only exist in the local store carry strictly
/// negative ids assigned by [`LocalStore::next_id`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,

    /// The 1-based line the comment belongs to.
    pub line: usize,

    pub text: String,

    /// Only meaningful for server comments.
    #[serde(default)]
    pub is_liked: Option<bool>,

    #[serde(default = "timestamp")]
    pub created_at: String,
}

impl Comment {
    /// Create a local comment stamped with the current time.
    pub fn local(id: i64, line: usize, text: CommentText) -> Self {
        Comment {
            id,
            line,
            text: text.into_inner(),
            is_liked: None,
            created_at: timestamp(),
        }
    }

    /// Whether the comment is currently liked. Unset counts as not liked.
    pub fn liked(&self) -> bool {
        self.is_liked.unwrap_or(false)
    }
}

/// The current moment in the same sortable format the backend uses.
pub fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Comment text that is known to be non-empty after trimming.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentText(String);

/// The comment text was empty or only whitespace.
#[derive(Debug, thiserror::Error)]
#[error("Comment text must not be empty.")]
pub struct EmptyText;

impl CommentText {
    pub fn parse(text: &str) -> Result<Self, EmptyText> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmptyText);
        }
        Ok(CommentText(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Where a comment lives, which decides the actions it supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tagged<'a> {
    /// Persisted by the backend. Can be liked, unliked and deleted remotely.
    Server(&'a Comment),

    /// Persisted in the local store only. Can only be deleted locally.
    Local(&'a Comment),
}

/// A line of code along with its comment thread.
pub struct Thread<'a> {
    /// The 1-based line number.
    pub line: usize,

    /// The code on this line.
    pub code: &'a str,

    /// Server comments first, then local comments, each in stored order.
    pub comments: Vec<Tagged<'a>>,

    /// Whether the thread is expanded and its line number selected.
    pub open: bool,
}

/// All comments attached to `line`, in their original order.
pub fn filter_by_line(line: usize, comments: &[Comment]) -> Vec<&Comment> {
    comments.iter().filter(|c| c.line == line).collect()
}

/// A negative id that no comment in `existing` uses.
///
/// Returns `-1` for an empty collection and `-(n + 1)` for the gap-free
/// collection `-1..=-n`. Returns `None` once `i64::MIN` is taken, since there
/// is no lower id left.
pub fn next_local_id(existing: &[Comment]) -> Option<i64> {
    existing.iter().map(|c| c.id).fold(0, i64::min).checked_sub(1)
}

/// The thread for a single line.
pub fn thread<'a>(
    line: usize,
    code: &'a str,
    server: &'a [Comment],
    local: &'a [Comment],
    open: Option<usize>,
) -> Thread<'a> {
    let comments = filter_by_line(line, server)
        .into_iter()
        .map(Tagged::Server)
        .chain(filter_by_line(line, local).into_iter().map(Tagged::Local))
        .collect();

    Thread {
        line,
        code,
        comments,
        open: open == Some(line),
    }
}

/// Split the code into lines and attach each line's comments.
///
/// This is the whole view: it is recomputed from the stores after every
/// mutation.
pub fn threads<'a>(
    code: &'a str,
    server: &'a [Comment],
    local: &'a [Comment],
    open: Option<usize>,
) -> Vec<Thread<'a>> {
    code.split('\n')
        .enumerate()
        .map(|(i, text)| thread(i + 1, text, server, local, open))
        .collect()
}

#[cfg(test)]
pub(crate) fn comment(id: i64, line: usize, text: &str) -> Comment {
    Comment {
        id,
        line,
        text: text.to_owned(),
        is_liked: None,
        created_at: "2024-01-01T00:00:00.000Z".to_owned(),
    }
}
