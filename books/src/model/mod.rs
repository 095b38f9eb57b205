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

//! High-level data types.

use bookshelf_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::Constructor;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

mod validator;
pub(crate) use validator::validate_book;

/// Opaque identifier of a book, assigned by the store when the book is created.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct BookId(Uuid);

impl BookId {
    /// Generates a new random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an untrusted string `s`, making sure it is well-formed.
    pub(crate) fn new(s: &str) -> ModelResult<Self> {
        match Uuid::parse_str(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(e) => Err(ModelError(format!("Invalid book id '{}': {}", s, e))),
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// The user-editable contents of a book.
///
/// Values of this type coming from the network must be obtained via `validate_book`.
#[derive(Constructor, Getters)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq))]
pub(crate) struct BookFields {
    /// Title of the book.
    title: String,

    /// Name of the author of the book.
    author: String,
}

/// A book as stored in the database.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Clone, Debug, Deserialize, PartialEq))]
pub(crate) struct Book {
    /// Identifier of the book.
    id: BookId,

    /// Title of the book.
    title: String,

    /// Name of the author of the book.
    author: String,
}

impl Book {
    /// Creates a book with identifier `id` and the contents in `fields`.
    pub(crate) fn from_fields(id: BookId, fields: BookFields) -> Self {
        Self { id, title: fields.title, author: fields.author }
    }
}
