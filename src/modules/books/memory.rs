//! In-memory [`BookRepository`] used by handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bookstore_db::{DbError, Result};
use time::{Duration, OffsetDateTime};

use super::models::{Book, BookId, BookInput};
use super::repository::BookRepository;

#[derive(Default)]
pub struct MemoryBookRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: BookId,
    last_tick: Option<OffsetDateTime>,
    books: Vec<Book>,
    unavailable: bool,
}

impl State {
    /// Strictly increasing clock, so ordering assertions are deterministic.
    fn tick(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(DbError::Store(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the store dropped away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn list(&self) -> Result<Vec<Book>> {
        let state = self.state.lock().unwrap();
        state.check_available()?;
        Ok(state.books.clone())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Book>> {
        let state = self.state.lock().unwrap();
        state.check_available()?;
        let mut books = state.books.clone();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        books.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(books)
    }

    async fn get(&self, id: BookId) -> Result<Book> {
        let state = self.state.lock().unwrap();
        state.check_available()?;
        state
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(DbError::not_found("book"))
    }

    async fn create(&self, input: &BookInput) -> Result<Book> {
        let mut state = self.state.lock().unwrap();
        state.check_available()?;
        state.next_id += 1;
        let now = state.tick();
        let book = Book {
            id: state.next_id,
            title: input.title.clone(),
            author: input.author.clone(),
            isbn: input.isbn.clone(),
            year: input.year,
            price: input.price,
            created_at: now,
            updated_at: now,
        };
        state.books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: BookId, input: &BookInput) -> Result<Book> {
        let mut state = self.state.lock().unwrap();
        state.check_available()?;
        let now = state.tick();
        let book = state
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(DbError::not_found("book"))?;
        book.title = input.title.clone();
        book.author = input.author.clone();
        book.isbn = input.isbn.clone();
        book.year = input.year;
        book.price = input.price;
        book.updated_at = now;
        Ok(book.clone())
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check_available()?;
        let before = state.books.len();
        state.books.retain(|book| book.id != id);
        if state.books.len() == before {
            return Err(DbError::not_found("book"));
        }
        Ok(())
    }
}
