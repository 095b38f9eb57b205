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

//! Test utilities for the business layer.

use crate::db::sqlite::SqliteBookStore;
use crate::db::BookStore;
use crate::driver::Driver;
use crate::model::*;
use std::sync::Arc;

pub(crate) struct TestContext {
    store: Arc<SqliteBookStore>,
    driver: Driver,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let pool = bookshelf_core::db::sqlite::testutils::setup().await;
        let store = Arc::new(SqliteBookStore::from(pool));
        store.migrate().await.unwrap();
        let driver = Driver::new(store.clone());
        Self { store, driver }
    }

    pub(crate) fn store(&self) -> &SqliteBookStore {
        &self.store
    }

    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Stores a book directly in the database, bypassing the driver.
    pub(crate) async fn create_book(&self, title: &str, author: &str) -> Book {
        self.store.create(BookFields::new(title.to_owned(), author.to_owned())).await.unwrap()
    }
}
