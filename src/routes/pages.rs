use super::*;

#[derive(Deserialize)]
pub struct CodeQuery {
    /// The line whose thread is expanded.
    open: Option<usize>,
}

pub async fn code(
    State(state): State<AppState>,
    Query(query): Query<CodeQuery>,
) -> Result<Markup, AppError> {
    let code = state.api.code().await?;
    let server = state.api.comments().await?;
    let local = local_store(&state).load()?;

    let threads = data::threads(&code, &server, &local, query.open);
    Ok(html::page(&threads))
}
