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

//! Operations on one book.

use crate::driver::{map_db_error, Driver};
use crate::model::*;
use bookshelf_core::driver::DriverResult;

impl Driver {
    /// Deletes the book identified by `id`.
    pub(crate) async fn delete_book(self, id: BookId) -> DriverResult<()> {
        self.store.delete(id).await.map_err(map_db_error)
    }

    /// Gets the book identified by `id`.
    pub(crate) async fn get_book(self, id: BookId) -> DriverResult<Book> {
        self.store.get(id).await.map_err(map_db_error)
    }

    /// Replaces the contents of the book identified by `id` with `fields`.
    pub(crate) async fn update_book(self, id: BookId, fields: BookFields) -> DriverResult<Book> {
        self.store.update(id, fields).await.map_err(map_db_error)
    }
}
