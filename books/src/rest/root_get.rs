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

//! API to check that the service is alive.

use bookshelf_core::rest::EmptyBody;

/// Greeting returned by the service.
const GREETING: &str = "Hello World!";

/// API handler.
pub(crate) async fn handler(_: EmptyBody) -> &'static str {
    GREETING
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use axum::http;
    use bookshelf_core::rest::testutils::*;

    fn route() -> (http::Method, &'static str) {
        (http::Method::GET, "/")
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_text("^Hello World!$")
            .await;
    }

    #[tokio::test]
    async fn test_content_type() {
        let context = TestContext::setup().await;

        let response =
            OneShotBuilder::new(context.app(), route()).send_empty().await.take_response().await;
        assert_eq!(
            "text/plain; charset=utf-8",
            response.headers().get(http::header::CONTENT_TYPE).unwrap()
        );
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
