use super::*;

pub async fn comment(
    State(state): State<AppState>,
    ReqPath(id): ReqPath<i64>,
) -> Result<Redirect, AppError> {
    let done = actions::delete_server(state.api.as_ref(), id).await?;
    Ok(reload(done))
}

pub async fn local_comment(
    State(state): State<AppState>,
    ReqPath(id): ReqPath<i64>,
) -> Result<Redirect, AppError> {
    let done = actions::delete_local(&local_store(&state), id)?;
    Ok(reload(done))
}
