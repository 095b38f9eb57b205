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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::*;
use bookshelf_core::db::DbResult;

pub(crate) mod postgres;
#[cfg(test)]
pub(crate) mod sqlite;

/// Persistent storage of books with high-level operations that deal with our types.
///
/// Every operation touches a single record and takes effect immediately.
#[async_trait::async_trait]
pub(crate) trait BookStore: Send + Sync {
    /// Creates the schema of the store if it does not exist yet.
    async fn migrate(&self) -> DbResult<()>;

    /// Stores a new book with the contents in `fields` and returns it with its new identifier.
    async fn create(&self, fields: BookFields) -> DbResult<Book>;

    /// Gets all existing books in no particular order.
    async fn list(&self) -> DbResult<Vec<Book>>;

    /// Gets the book identified by `id`.
    async fn get(&self, id: BookId) -> DbResult<Book>;

    /// Replaces the contents of the book identified by `id` with `fields` and returns the
    /// updated book.
    async fn update(&self, id: BookId, fields: BookFields) -> DbResult<Book>;

    /// Deletes the book identified by `id`.
    async fn delete(&self, id: BookId) -> DbResult<()>;
}
