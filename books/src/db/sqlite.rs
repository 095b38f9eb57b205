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

//! Implementation of the database abstraction using SQLite.

use crate::db::BookStore;
use crate::model::*;
use bookshelf_core::db::sqlite::{map_sqlx_error, run_schema};
use bookshelf_core::db::{DbError, DbResult};
use futures::TryStreamExt;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

/// Schema to use to initialize the test database.
const SCHEMA: &str = include_str!("sqlite.sql");

/// A book store backed by a SQLite database.
#[derive(Clone)]
pub(crate) struct SqliteBookStore {
    /// Shared pool of connections to the database.
    pool: SqlitePool,
}

impl From<SqlitePool> for SqliteBookStore {
    fn from(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Converts a row with the `id`, `title` and `author` columns into a book.
fn row_to_book(row: SqliteRow) -> DbResult<Book> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let title: String = row.try_get("title").map_err(map_sqlx_error)?;
    let author: String = row.try_get("author").map_err(map_sqlx_error)?;
    Ok(Book::new(BookId::new(&id)?, title, author))
}

impl SqliteBookStore {
    /// Removes the schema of the store so that all further operations fail.
    pub(crate) async fn break_schema(&self) {
        sqlx::query("DROP TABLE books").execute(&self.pool).await.unwrap();
    }
}

#[async_trait::async_trait]
impl BookStore for SqliteBookStore {
    async fn migrate(&self) -> DbResult<()> {
        run_schema(&self.pool, SCHEMA).await
    }

    async fn create(&self, fields: BookFields) -> DbResult<Book> {
        let id = BookId::generate();

        let query_str = "INSERT INTO books (id, title, author) VALUES (?, ?, ?)";
        let done = sqlx::query(query_str)
            .bind(id.to_string())
            .bind(fields.title())
            .bind(fields.author())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if done.rows_affected() != 1 {
            return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
        }
        Ok(Book::from_fields(id, fields))
    }

    async fn list(&self) -> DbResult<Vec<Book>> {
        let query_str = "SELECT id, title, author FROM books";
        let mut rows = sqlx::query(query_str).fetch(&self.pool);

        let mut books = vec![];
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            books.push(row_to_book(row)?);
        }
        Ok(books)
    }

    async fn get(&self, id: BookId) -> DbResult<Book> {
        let query_str = "SELECT id, title, author FROM books WHERE id = ?";
        let row = sqlx::query(query_str)
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row_to_book(row)
    }

    async fn update(&self, id: BookId, fields: BookFields) -> DbResult<Book> {
        let query_str = "UPDATE books SET title = ?, author = ? WHERE id = ?";
        let done = sqlx::query(query_str)
            .bind(fields.title())
            .bind(fields.author())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if done.rows_affected() == 0 {
            return Err(DbError::NotFound);
        } else if done.rows_affected() != 1 {
            return Err(DbError::BackendError("Update affected more than one row".to_owned()));
        }
        Ok(Book::from_fields(id, fields))
    }

    async fn delete(&self, id: BookId) -> DbResult<()> {
        let query_str = "DELETE FROM books WHERE id = ?";
        let done = sqlx::query(query_str)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if done.rows_affected() == 0 {
            return Err(DbError::NotFound);
        } else if done.rows_affected() != 1 {
            return Err(DbError::BackendError("Deletion affected more than one row".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::generate_db_tests;

    /// Creates an in-memory database and prepares it to host books.
    async fn setup() -> SqliteBookStore {
        let store = SqliteBookStore::from(bookshelf_core::db::sqlite::testutils::setup().await);
        store.migrate().await.unwrap();
        store
    }

    generate_db_tests!(setup().await);
}
