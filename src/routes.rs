use std::sync::MutexGuard;

use axum::extract::{Path as ReqPath, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use maud::Markup;
use serde::Deserialize;

use crate::actions::{self, Reload};
use crate::data::{self, LocalStore};
use crate::error::AppError;
use crate::{html, AppState};

pub mod components;
pub mod delete;
pub mod pages;
pub mod post;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::code))
        .route("/comment/:id", get(components::comment))
        .route("/like/:id", post(post::like))
        .route("/local/remove/:id", post(delete::local_comment))
        .route("/remove/:id", post(delete::comment))
        .route("/save/:line", post(post::save))
        .route("/send/:line", post(post::send))
        .route("/thread/:line", get(components::thread))
        .with_state(state)
}

/// Send the viewer back to the freshly computed view.
fn reload(reload: Reload) -> Redirect {
    match reload.line {
        Some(line) => Redirect::to(&format!("/?open={line}#line-{line}")),
        None => Redirect::to("/"),
    }
}

fn local_store(state: &AppState) -> MutexGuard<'_, LocalStore> {
    state.local.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::util::ServiceExt;

    use super::*;
    use crate::actions::fake::{Call, FakeApi};
    use crate::data::{comment, MemoryStorage};

    fn state(api: Arc<FakeApi>) -> (AppState, LocalStore) {
        let store = LocalStore::new(Arc::new(MemoryStorage::new()));
        let state = AppState {
            api,
            local: Arc::new(Mutex::new(store.clone())),
        };
        (state, store)
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn view_renders_every_line_and_comment() {
        let mut c = comment(5, 2, "hi");
        c.is_liked = Some(false);
        let api = Arc::new(FakeApi::new("a\nb\nc", vec![c]));
        let (state, store) = state(api);
        store.append(comment(-1, 3, "note")).unwrap();

        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains(r#"id="line-3""#));
        assert!(body.contains(r#"id="comment-5""#));
        assert!(body.contains(r#"id="comment--1""#));
    }

    #[tokio::test]
    async fn like_toggles_and_reloads() {
        let mut c = comment(5, 2, "hi");
        c.is_liked = Some(false);
        let api = Arc::new(FakeApi::new("a\nb\nc", vec![c]));
        let (state, _) = state(api.clone());

        let response = router(state).oneshot(form("/like/5", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/?open=2#line-2"
        );
        assert!(api.calls().contains(&Call::UpdateIsLiked(5, true)));
    }

    #[tokio::test]
    async fn saved_comment_lands_in_the_local_store() {
        let api = Arc::new(FakeApi::new("a\nb\nc", Vec::new()));
        let (state, store) = state(api.clone());

        let response = router(state)
            .oneshot(form("/save/3", "text=note"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let saved = store.load().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!((saved[0].id, saved[0].line, saved[0].text.as_str()), (-1, 3, "note"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_send_is_rejected_without_calling_the_backend() {
        let api = Arc::new(FakeApi::new("a", Vec::new()));
        let (state, _) = state(api.clone());

        let response = router(state)
            .oneshot(form("/send/1", "text=+++"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains(r#"role="alert""#));
        assert!(body.contains(r#"href="/?open=1#line-1""#));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn line_zero_is_rejected_before_any_write() {
        let api = Arc::new(FakeApi::new("a\nb", Vec::new()));
        let (state, store) = state(api.clone());
        let app = router(state);

        for uri in ["/save/0", "/send/0"] {
            let response = app.clone().oneshot(form(uri, "text=x")).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert!(body_string(response).await.contains(r#"href="/""#));
        }

        assert!(store.load().unwrap().is_empty());
        assert!(!api.calls().iter().any(|c| matches!(c, Call::Create(..))));
    }

    #[tokio::test]
    async fn local_comment_is_removed() {
        let api = Arc::new(FakeApi::new("a", Vec::new()));
        let (state, store) = state(api);
        store.append(comment(-1, 1, "a")).unwrap();
        store.append(comment(-2, 1, "b")).unwrap();

        let response = router(state)
            .oneshot(form("/local/remove/-1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.load().unwrap(), vec![comment(-2, 1, "b")]);
    }

    #[tokio::test]
    async fn missing_thread_is_not_found() {
        let api = Arc::new(FakeApi::new("a\nb", Vec::new()));
        let (state, _) = state(api);

        let response = router(state)
            .oneshot(Request::builder().uri("/thread/9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
