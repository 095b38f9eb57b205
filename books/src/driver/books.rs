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

//! Operations on the collection of books.

use crate::driver::{map_db_error, Driver};
use crate::model::*;
use bookshelf_core::driver::{DriverError, DriverResult};

impl Driver {
    /// Stores a new book with the contents in `fields`.
    ///
    /// Any failure to store the book is reported as invalid input, carrying the store's message.
    pub(crate) async fn create_book(self, fields: BookFields) -> DriverResult<Book> {
        match self.store.create(fields).await {
            Ok(book) => Ok(book),
            Err(e) => Err(DriverError::InvalidInput(e.to_string())),
        }
    }

    /// Gets all existing books.
    pub(crate) async fn list_books(self) -> DriverResult<Vec<Book>> {
        self.store.list().await.map_err(map_db_error)
    }
}
