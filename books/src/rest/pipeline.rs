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

//! Middleware that every request goes through before reaching the handlers.

use crate::ratelimit::{RateLimiter, Verdict};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bookshelf_core::rest::RestError;
use log::{info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

/// Name of the header that tells clients their request quota.
const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";

/// Name of the header that tells clients how many requests they have left.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Address used to account for requests whose peer address is unknown.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Defensive headers added to every response, unless already present.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;object-src 'none';\
         script-src 'self';script-src-attr 'none';style-src 'self' https: 'unsafe-inline';\
         upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Adds the `SECURITY_HEADERS` to the response of any request.
pub(crate) async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        let name = HeaderName::from_static(*name);
        if !headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(*value));
        }
    }

    response
}

/// Returns the IP address of the client that sent `request`.
fn client_ip(request: &Request) -> IpAddr {
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => addr.ip(),
        None => {
            warn!("No peer address for {}; accounting as {}", request.uri(), UNKNOWN_CLIENT);
            UNKNOWN_CLIENT
        }
    }
}

/// Rejects requests from clients that have exceeded their quota and tells all clients about
/// their remaining quota.
pub(crate) async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);

    let (mut response, remaining) = match limiter.check(ip).await {
        Verdict::Admit { remaining } => {
            if remaining == 0 {
                info!("Client {} exhausted its quota of {} requests", ip, limiter.max_requests());
            }
            (next.run(request).await, remaining)
        }
        Verdict::Reject { retry_after_secs } => {
            (RestError::TooManyRequests { retry_after_secs }.into_response(), 0)
        }
    };

    let headers = response.headers_mut();
    headers.insert(HeaderName::from_static(RATE_LIMIT_LIMIT), limiter.max_requests().into());
    headers.insert(HeaderName::from_static(RATE_LIMIT_REMAINING), remaining.into());
    response
}

/// Creates the permissive CORS policy for the service.
pub(crate) fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
