pub mod handlers;
#[cfg(test)]
mod memory;
pub mod models;
pub mod repository;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookstore_kernel::{InitCtx, Module};

use repository::SharedRepository;

/// Book inventory: CRUD over the `books` table plus the new-arrivals view.
pub struct BooksModule {
    repository: SharedRepository,
}

impl BooksModule {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            recent_limit = repository::RECENT_LIMIT,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route("/new", get(handlers::list_new_books))
            .route(
                "/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_body = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let book_list = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        }
                    }
                }
            })
        };
        let input_body = serde_json::json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookInput" }
                }
            }
        });
        let id_param = serde_json::json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "search",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive match against title or author",
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": book_list("All books, possibly empty"),
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": input_body.clone(),
                        "responses": {
                            "201": book_body("Created book"),
                            "400": error("Malformed payload"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/new": {
                    "get": {
                        "summary": "Most recently added books",
                        "tags": ["Books"],
                        "responses": {
                            "200": book_list("Newest books first"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": book_body("The book"),
                            "400": error("Malformed id"),
                            "404": error("No such book"),
                            "500": error("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": input_body,
                        "responses": {
                            "200": book_body("Updated book"),
                            "400": error("Malformed id or payload"),
                            "404": error("No such book"),
                            "500": error("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "Book deleted" },
                            "400": error("Malformed id"),
                            "404": error("No such book"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "year": { "type": "integer" },
                            "price": { "type": "number", "minimum": 0 },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": [
                            "id", "title", "author", "isbn", "year", "price",
                            "created_at", "updated_at"
                        ]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "year": { "type": "integer" },
                            "price": { "type": "number", "minimum": 0 }
                        },
                        "required": ["title", "author"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module backed by `repository`
pub fn create_module(repository: SharedRepository) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository))
}
