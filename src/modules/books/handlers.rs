use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use bookstore_http::error::AppError;
use serde::Deserialize;
use serde_json::{json, Value};

use super::models::{Book, BookId, BookInput};
use super::repository::{SharedRepository, RECENT_LIMIT};

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive match against title or author
    pub search: Option<String>,
}

/// `GET /api/v1/books`
///
/// The search filter runs over the fetched rows rather than in SQL.
pub async fn list_books(
    State(repo): State<SharedRepository>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = repo.list().await?;

    let books = match query.search.as_deref().map(str::trim) {
        Some(needle) if !needle.is_empty() => {
            books.into_iter().filter(|b| b.matches(needle)).collect()
        }
        _ => books,
    };

    Ok(Json(books))
}

/// `GET /api/v1/books/new`
pub async fn list_new_books(
    State(repo): State<SharedRepository>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(repo.list_recent(RECENT_LIMIT).await?))
}

/// `GET /api/v1/books/{id}`
pub async fn get_book(
    State(repo): State<SharedRepository>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    Ok(Json(repo.get(id).await?))
}

/// `POST /api/v1/books`
pub async fn create_book(
    State(repo): State<SharedRepository>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let input = payload_body(payload)?;
    let book = repo.create(&input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `PUT /api/v1/books/{id}`
pub async fn update_book(
    State(repo): State<SharedRepository>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let input = payload_body(payload)?;
    Ok(Json(repo.update(id, &input).await?))
}

/// `DELETE /api/v1/books/{id}`
pub async fn delete_book(
    State(repo): State<SharedRepository>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = book_id(id)?;
    repo.delete(id).await?;
    Ok(Json(json!({ "message": "book deleted successfully" })))
}

fn book_id(id: Result<Path<BookId>, PathRejection>) -> Result<BookId, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

fn payload_body(payload: Result<Json<BookInput>, JsonRejection>) -> Result<BookInput, AppError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}
