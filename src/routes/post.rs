use super::*;

#[derive(Deserialize)]
pub struct NewComment {
    #[serde(default)]
    text: String,
}

pub async fn like(
    State(state): State<AppState>,
    ReqPath(id): ReqPath<i64>,
) -> Result<Redirect, AppError> {
    let done = actions::toggle_like(state.api.as_ref(), id).await?;
    Ok(reload(done))
}

pub async fn save(
    State(state): State<AppState>,
    ReqPath(line): ReqPath<usize>,
    Form(body): Form<NewComment>,
) -> Result<Redirect, AppError> {
    let done = actions::save(&local_store(&state), line, &body.text)?;
    Ok(reload(done))
}

pub async fn send(
    State(state): State<AppState>,
    ReqPath(line): ReqPath<usize>,
    Form(body): Form<NewComment>,
) -> Result<Redirect, AppError> {
    let done = actions::send(state.api.as_ref(), line, &body.text).await?;
    Ok(reload(done))
}
