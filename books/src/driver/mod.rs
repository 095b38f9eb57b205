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

//! Business logic for the service.

use crate::db::BookStore;
use bookshelf_core::db::DbError;
use bookshelf_core::driver::DriverError;
use std::sync::Arc;

mod book;
mod books;
#[cfg(test)]
pub(crate) mod testutils;

/// Message reported when an operation targets a book that does not exist.
pub(crate) const BOOK_NOT_FOUND_MESSAGE: &str = "Book not found";

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they issue a single store
/// operation and there is nothing to coordinate across calls.  These operations consume the driver
/// to keep the calling pattern consistent with the rest of the layers.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The store that the driver uses for persistence.
    store: Arc<dyn BookStore>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

/// Converts a store error `e` into a driver error, naming books in "not found" conditions.
fn map_db_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(BOOK_NOT_FOUND_MESSAGE.to_owned()),
        e => DriverError::from(e),
    }
}
