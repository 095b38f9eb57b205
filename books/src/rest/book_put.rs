// Bookshelf
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! API to replace the contents of one book.

use crate::driver::Driver;
use crate::model::{validate_book, Book};
use crate::rest::parse_book_id;
use axum::extract::{Path, State};
use axum::Json;
use bookshelf_core::rest::{JsonBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    JsonBody(candidate): JsonBody<serde_json::Value>,
) -> Result<Json<Book>, RestError> {
    let fields = validate_book(&candidate)?;
    let id = parse_book_id(&id)?;
    let book = driver.update_book(id, fields).await?;
    Ok(Json(book))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use bookshelf_core::rest::testutils::*;
    use serde_json::json;

    fn route<I: ToString>(id: I) -> (http::Method, String) {
        (http::Method::PUT, format!("/books/{}", id.to_string()))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let book = context.create_book("Dune", "Frank Herbert").await;
        let other = context.create_book("Hyperion", "Dan Simmons").await;

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(json!({"title": "Dune Messiah", "author": "F. Herbert"}))
            .await
            .expect_json::<Book>()
            .await;
        let exp_book = Book::new(*book.id(), "Dune Messiah".to_owned(), "F. Herbert".to_owned());
        assert_eq!(exp_book, response);

        assert_eq!(Some(exp_book), context.get_book(*book.id()).await);
        assert_eq!(Some(other.clone()), context.get_book(*other.id()).await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(BookId::generate()))
            .send_json(json!({"title": "Dune Messiah", "author": "F. Herbert"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Book not found$")
            .await;

        assert!(context.books().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("123"))
            .send_json(json!({"title": "Dune Messiah", "author": "F. Herbert"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Book not found$")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_payload() {
        let context = TestContext::setup().await;

        let book = context.create_book("Dune", "Frank Herbert").await;

        OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(json!({"title": "Dune Messiah", "author": ""}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^\"author\" is not allowed to be empty$")
            .await;

        assert_eq!(Some(book.clone()), context.get_book(*book.id()).await);
    }

    #[tokio::test]
    async fn test_rejects_unknown_keys() {
        let context = TestContext::setup().await;

        let book = context.create_book("Dune", "Frank Herbert").await;

        OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(json!({"title": "Dune Messiah", "author": "F. Herbert", "id": "forged"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^\"id\" is not allowed$")
            .await;

        assert_eq!(Some(book.clone()), context.get_book(*book.id()).await);
    }

    #[tokio::test]
    async fn test_invalid_payload_checked_before_id() {
        let context = TestContext::setup().await;

        for id in [BookId::generate().to_string(), "malformed".to_owned()] {
            OneShotBuilder::new(context.app(), route(id))
                .send_json(json!({"author": "F. Herbert"}))
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error("^\"title\" is required$")
                .await;
        }
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;
        context.break_store().await;

        OneShotBuilder::new(context.app(), route(BookId::generate()))
            .send_json(json!({"title": "Dune Messiah", "author": "F. Herbert"}))
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Something went wrong$")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route(BookId::generate()));
}
