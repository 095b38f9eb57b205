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

//! Test utilities for the REST API.

use crate::db::sqlite::SqliteBookStore;
use crate::db::BookStore;
use crate::driver::Driver;
use crate::model::*;
use crate::ratelimit::{RateLimiter, RateLimiterOptions};
use crate::rest::app;
use axum::extract::ConnectInfo;
use axum::Router;
use bookshelf_core::clocks::testutils::SettableClock;
use bookshelf_core::db::DbError;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use time::macros::datetime;

/// Returns the connection details of the `n`th fake client.
pub(crate) fn client(n: u8) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from((Ipv4Addr::new(10, 0, 0, n), 40000 + u16::from(n))))
}

pub(crate) struct TestContext {
    store: Arc<SqliteBookStore>,
    clock: Arc<SettableClock>,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        Self::setup_with_options(RateLimiterOptions::default()).await
    }

    pub(crate) async fn setup_with_limit(window: Duration, max_requests: u32) -> Self {
        let opts = RateLimiterOptions { window, max_requests, ..Default::default() };
        Self::setup_with_options(opts).await
    }

    async fn setup_with_options(opts: RateLimiterOptions) -> Self {
        let pool = bookshelf_core::db::sqlite::testutils::setup().await;
        let store = Arc::new(SqliteBookStore::from(pool));
        store.migrate().await.unwrap();

        let clock = Arc::new(SettableClock::new(datetime!(2023-12-01 10:00:00 UTC)));
        let limiter = RateLimiter::new(opts, clock.clone());

        let app = app(Driver::new(store.clone()), limiter);
        Self { store, clock, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Makes all further database operations fail.
    pub(crate) async fn break_store(&self) {
        self.store.break_schema().await
    }

    /// Stores a book directly in the database, bypassing the REST API.
    pub(crate) async fn create_book(&self, title: &str, author: &str) -> Book {
        self.store.create(BookFields::new(title.to_owned(), author.to_owned())).await.unwrap()
    }

    /// Gets the book identified by `id` directly from the database, if it exists.
    pub(crate) async fn get_book(&self, id: BookId) -> Option<Book> {
        match self.store.get(id).await {
            Ok(book) => Some(book),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("Failed to query book {}: {}", id, e),
        }
    }

    /// Gets all books directly from the database, sorted by identifier.
    pub(crate) async fn books(&self) -> Vec<Book> {
        let mut books = self.store.list().await.unwrap();
        books.sort_by_key(|b| *b.id());
        books
    }
}
