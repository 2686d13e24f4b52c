//! Data access for the `books` table.

use std::sync::Arc;

use async_trait::async_trait;
use bookstore_db::{DbError, PgPool, Result};
use tracing::instrument;

use super::models::{Book, BookId, BookInput};

/// Number of records in the "new arrivals" view.
pub const RECENT_LIMIT: i64 = 4;

const ENTITY: &str = "book";

const SELECT_COLUMNS: &str =
    "SELECT id, title, author, isbn, year, price, created_at, updated_at FROM books";

/// Repository handed to the HTTP handlers.
pub type SharedRepository = Arc<dyn BookRepository>;

/// CRUD operations over book records.
///
/// Every write is a single statement, so there are no partial writes.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All records in stable order; an empty table yields an empty vec
    async fn list(&self) -> Result<Vec<Book>>;

    /// Up to `limit` records, newest `created_at` first
    async fn list_recent(&self, limit: i64) -> Result<Vec<Book>>;

    async fn get(&self, id: BookId) -> Result<Book>;

    /// Insert a record; the store assigns the id and both timestamps
    async fn create(&self, input: &BookInput) -> Result<Book>;

    /// Replace every mutable field and bump `updated_at`
    async fn update(&self, id: BookId, input: &BookInput) -> Result<Book>;

    async fn delete(&self, id: BookId) -> Result<()>;
}

/// PostgreSQL-backed [`BookRepository`].
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    #[instrument(skip(self), err)]
    async fn list_recent(&self, limit: i64) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: BookId) -> Result<Book> {
        sqlx::query_as::<_, Book>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::not_found(ENTITY))
    }

    #[instrument(skip(self, input), fields(title = %input.title), err)]
    async fn create(&self, input: &BookInput) -> Result<Book> {
        // NOW() is fixed per transaction, so both timestamps are identical.
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, year, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, title, author, isbn, year, price, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(input.year)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(book_id = book.id, "book created");
        Ok(book)
    }

    #[instrument(skip(self, input), err)]
    async fn update(&self, id: BookId, input: &BookInput) -> Result<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, year = $4, price = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, title, author, isbn, year, price, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(input.year)
        .bind(input.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::not_found(ENTITY))?;

        tracing::info!(book_id = book.id, "book updated");
        Ok(book)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: BookId) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY));
        }

        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }
}
