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

//! REST service to manage a collection of books.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bookshelf_core::clocks::SystemClock;
use bookshelf_core::db::postgres::{self, PostgresOptions};
use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub(crate) mod db;
use db::postgres::PostgresBookStore;
use db::BookStore;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
pub mod ratelimit;
use ratelimit::{RateLimiter, RateLimiterOptions};
mod rest;
use rest::app;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// The database schema is created if it does not exist yet before the server starts accepting
/// connections.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db_opts: PostgresOptions,
    limiter_opts: RateLimiterOptions,
) -> Result<(), Box<dyn Error>> {
    let store = PostgresBookStore::from(postgres::connect(db_opts));
    store.migrate().await?;
    let driver = Driver::new(Arc::new(store));

    let limiter = RateLimiter::new(limiter_opts, Arc::new(SystemClock::default()));
    let app = app(driver, limiter);

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server running at http://{}", bind_addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
