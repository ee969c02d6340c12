//! The things a viewer can do to a comment.
//!
//! Every action either mutates the local store or calls the backend, then
//! hands back a [`Reload`]: the view has to be rebuilt from the stores to
//! show the result.

use tracing::info;

use crate::data::{ApiError, Comment, CommentApi, CommentText, EmptyText, LocalStore, StoreError};

/// The view is stale and has to be recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reload {
    /// The line the change happened on, if known.
    pub line: Option<usize>,
}

/// Why a new comment was refused before anything was stored or sent.
#[derive(Debug, thiserror::Error)]
pub enum Invalid {
    #[error(transparent)]
    Text(#[from] EmptyText),

    #[error("Comments can only be attached to lines 1 and up.")]
    Line,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// `line` is where the viewer was typing.
    #[error("{reason}")]
    Validation { line: usize, reason: Invalid },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Flip the like state of a server comment.
pub async fn toggle_like(api: &dyn CommentApi, id: i64) -> Result<Reload, ActionError> {
    let comment = api.comment(id).await?;
    let is_liked = !comment.liked();
    api.update_is_liked(id, is_liked).await?;
    info!(id, is_liked, "updated like state");

    Ok(Reload {
        line: Some(comment.line),
    })
}

/// Delete a server comment.
pub async fn delete_server(api: &dyn CommentApi, id: i64) -> Result<Reload, ActionError> {
    api.remove(id).await?;
    info!(id, "removed server comment");

    Ok(Reload { line: None })
}

/// Delete a local comment. Unknown ids are ignored.
pub fn delete_local(store: &LocalStore, id: i64) -> Result<Reload, ActionError> {
    let line = store
        .load()?
        .into_iter()
        .find(|c| c.id == id)
        .map(|c| c.line);
    store.remove(id)?;
    info!(id, "removed local comment");

    Ok(Reload { line })
}

fn validate(line: usize, text: &str) -> Result<CommentText, ActionError> {
    let invalid = |reason| ActionError::Validation { line, reason };
    if line == 0 {
        return Err(invalid(Invalid::Line));
    }
    CommentText::parse(text).map_err(|e| invalid(e.into()))
}

/// Keep a new comment in the local store only.
pub fn save(store: &LocalStore, line: usize, text: &str) -> Result<Reload, ActionError> {
    let text = validate(line, text)?;
    let id = store.next_id()?;
    store.append(Comment::local(id, line, text))?;
    info!(id, line, "saved local comment");

    Ok(Reload { line: Some(line) })
}

/// Create a new comment on the backend.
pub async fn send(api: &dyn CommentApi, line: usize, text: &str) -> Result<Reload, ActionError> {
    let text = validate(line, text)?;
    let created = api.create(line, &text).await?;
    info!(id = created.id, line, "created server comment");

    Ok(Reload { line: Some(line) })
}
