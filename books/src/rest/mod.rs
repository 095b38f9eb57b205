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

//! Entry point to the REST server.

use crate::driver::{Driver, BOOK_NOT_FOUND_MESSAGE};
use crate::model::BookId;
use crate::ratelimit::RateLimiter;
use axum::Router;
use bookshelf_core::rest::{RestError, RestResult};
use log::debug;

mod book_delete;
mod book_get;
mod book_put;
mod books_get;
mod books_post;
mod pipeline;
mod root_get;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.
///
/// Requests go through the security headers, the rate limiter and the CORS policy, in this
/// order, before reaching the handlers.
pub(crate) fn app(driver: Driver, limiter: RateLimiter) -> Router {
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    Router::new()
        .route("/", get(root_get::handler))
        .route("/books", get(books_get::handler).post(books_post::handler))
        .route(
            "/books/:id",
            get(book_get::handler).put(book_put::handler).delete(book_delete::handler),
        )
        .with_state(driver)
        .layer(pipeline::cors())
        .layer(from_fn_with_state(limiter, pipeline::rate_limit))
        .layer(from_fn(pipeline::security_headers))
}

/// Parses the book identifier `raw` obtained from a request path.
///
/// Malformed identifiers cannot match any book so they are reported as not found.
fn parse_book_id(raw: &str) -> RestResult<BookId> {
    BookId::new(raw).map_err(|e| {
        debug!("Rejecting request for malformed id: {}", e);
        RestError::NotFound(BOOK_NOT_FOUND_MESSAGE.to_owned())
    })
}
