use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use ar_core::{ArticlePatch, NewArticle};
use serde_json::json;
use tracing::info;
use crate::error::{ApiError, OrFail};
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

pub async fn scrape_articles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    info!("🦗 Scraping articles from source...");
    let summary = state.manager.scrape_and_save().await.or_fail("Failed to scrape articles")?;
    info!("Saved {} new articles", summary.articles.len());
    Ok(Json(summary))
}

pub async fn update_with_ai(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    info!("🤖 Starting AI update process...");
    let summary = state.manager.run_update().await.or_fail("Failed to update articles")?;
    Ok(Json(summary))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let articles = state.storage.list().await.or_fail("Failed to fetch articles")?;
    Ok(Json(json!({
        "success": true,
        "count": articles.len(),
        "articles": articles,
    })))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let article = state
        .storage
        .get(&id)
        .await
        .or_fail("Failed to fetch article")?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    Ok(Json(json!({ "success": true, "article": article })))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    Json(article): Json<NewArticle>,
) -> ApiResult<impl IntoResponse> {
    article.validate().or_fail("Failed to create article")?;
    let article = state.storage.create(article).await.or_fail("Failed to create article")?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Article created successfully",
            "article": article,
        })),
    ))
}

pub async fn update_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ArticlePatch>,
) -> ApiResult<impl IntoResponse> {
    patch.validate().or_fail("Failed to update article")?;
    let article = state
        .storage
        .update(&id, patch)
        .await
        .or_fail("Failed to update article")?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    Ok(Json(json!({
        "success": true,
        "message": "Article updated successfully",
        "article": article,
    })))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !state.storage.delete(&id).await.or_fail("Failed to delete article")? {
        return Err(ApiError::not_found("Article not found"));
    }
    Ok(Json(json!({ "success": true, "message": "Article deleted successfully" })))
}
