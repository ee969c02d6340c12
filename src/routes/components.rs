use super::*;

pub async fn thread(
    State(state): State<AppState>,
    ReqPath(line): ReqPath<usize>,
) -> Result<Response, AppError> {
    let code = state.api.code().await?;
    let Some(text) = line.checked_sub(1).and_then(|i| code.split('\n').nth(i)) else {
        let message = format!("There is no line {line}.");
        return Ok((StatusCode::NOT_FOUND, html::failure(&message)).into_response());
    };

    let server = state.api.comments().await?;
    let local = local_store(&state).load()?;

    let thread = data::thread(line, text, &server, &local, Some(line));
    Ok(html::components::comments(&thread).into_response())
}

pub async fn comment(
    State(state): State<AppState>,
    ReqPath(id): ReqPath<i64>,
) -> Result<Markup, AppError> {
    let comment = state.api.comment(id).await?;
    Ok(html::components::server_comment(&comment))
}
