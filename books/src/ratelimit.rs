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

//! Per-client request rate limiting.
//!
//! Clients are identified by their IP address and are allowed a maximum number of requests over a
//! sliding window of time.  Counters live in memory only and are dropped once a client has been
//! idle for a whole window.

use bookshelf_core::clocks::Clock;
use bookshelf_core::env::get_optional_var;
use derivative::Derivative;
use futures::lock::Mutex;
use lru_time_cache::LruCache;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Default length of the window over which requests are counted.
const DEFAULT_WINDOW_SECONDS: u64 = 15 * 60;

/// Default maximum number of requests a client can issue within a window.
const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default maximum number of clients to track at once.
const DEFAULT_CAPACITY: usize = 10 * 1024;

/// Options to configure a `RateLimiter`.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct RateLimiterOptions {
    /// Length of the window over which requests are counted.
    pub window: Duration,

    /// Maximum number of requests a client can issue within `window`.
    pub max_requests: u32,

    /// Maximum number of clients to track at once.
    pub capacity: usize,
}

impl Default for RateLimiterOptions {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(DEFAULT_WINDOW_SECONDS),
            max_requests: DEFAULT_MAX_REQUESTS,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RateLimiterOptions {
    /// Creates a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_WINDOW`, `<prefix>_MAX_REQUESTS` and
    /// `<prefix>_CAPACITY`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let window = get_optional_var::<Duration>(prefix, "WINDOW")?
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_WINDOW_SECONDS));
        if window.as_secs() == 0 {
            return Err(format!("{}_WINDOW must be at least one second", prefix));
        }
        Ok(Self {
            window,
            max_requests: get_optional_var::<u32>(prefix, "MAX_REQUESTS")?
                .unwrap_or(DEFAULT_MAX_REQUESTS),
            capacity: get_optional_var::<usize>(prefix, "CAPACITY")?.unwrap_or(DEFAULT_CAPACITY),
        })
    }
}

/// Tracks the requests admitted for a single client over a sliding window of time.
///
/// Only admitted requests are recorded, so the log never holds more entries than the maximum
/// number of requests allowed per window.
pub(crate) struct RequestCounter {
    /// Length of the window over which requests are counted.
    window: Duration,

    /// Timestamps of the admitted requests that may still fall within the window, oldest first.
    admitted: VecDeque<OffsetDateTime>,
}

impl RequestCounter {
    /// Creates a new request counter that tracks requests over `window`.
    pub(crate) fn new(window: Duration) -> Self {
        Self { window, admitted: VecDeque::new() }
    }

    /// Forgets the requests that are out of the window ending at `now`.
    fn expire(&mut self, now: OffsetDateTime) {
        while let Some(oldest) = self.admitted.front().copied() {
            if oldest + self.window > now {
                break;
            }
            self.admitted.pop_front();
        }
    }

    /// Adds a request to the counter at time `now`.
    pub(crate) fn account(&mut self, now: OffsetDateTime) {
        self.admitted.push_back(now);
    }

    /// Counts the number of requests during the window that ends at `now`.
    pub(crate) fn in_window(&mut self, now: OffsetDateTime) -> u32 {
        self.expire(now);
        u32::try_from(self.admitted.len()).unwrap_or(u32::MAX)
    }

    /// Computes how many seconds after `now` the oldest request in the window stops counting,
    /// rounded up.
    ///
    /// If there are no requests in the window, returns the length of the window.
    pub(crate) fn retry_after(&self, now: OffsetDateTime) -> u64 {
        let expires_at = match self.admitted.front() {
            Some(oldest) => *oldest + self.window,
            None => now + self.window,
        };
        let wait = expires_at - now;
        let mut secs = wait.whole_seconds();
        if wait.subsec_nanoseconds() > 0 {
            secs += 1;
        }
        u64::try_from(secs).unwrap_or(0).max(1)
    }
}

/// Outcome of checking a request against the rate limiter.
#[derive(Debug, PartialEq)]
pub(crate) enum Verdict {
    /// The request is allowed to proceed and the client can issue `remaining` more requests in
    /// the current window.
    Admit {
        /// Number of requests the client can still issue in the current window.
        remaining: u32,
    },

    /// The request must be rejected and the client should wait `retry_after_secs` seconds before
    /// trying again.
    Reject {
        /// Number of seconds until the client regains quota.
        retry_after_secs: u64,
    },
}

/// Limits the number of requests each client can issue over a window of time.
#[derive(Clone)]
pub(crate) struct RateLimiter {
    /// Clock to obtain the current time from.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Length of the window over which requests are counted.
    window: Duration,

    /// Maximum number of requests a client can issue within `window`.
    max_requests: u32,

    /// Per-client request counters.
    counters: Arc<Mutex<LruCache<IpAddr, RequestCounter>>>,
}

impl RateLimiter {
    /// Creates a new rate limiter configured by `opts` that is backed by `clock`.
    pub(crate) fn new(opts: RateLimiterOptions, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let counters = LruCache::with_expiry_duration_and_capacity(opts.window, opts.capacity);
        Self {
            clock,
            window: opts.window,
            max_requests: opts.max_requests,
            counters: Arc::from(Mutex::from(counters)),
        }
    }

    /// Returns the maximum number of requests a client can issue within a window.
    pub(crate) fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Checks whether the client at `ip` can issue one more request and accounts for it if so.
    ///
    /// Rejected requests do not count towards the client's quota.
    pub(crate) async fn check(&self, ip: IpAddr) -> Verdict {
        let now = self.clock.now_utc();
        let window = self.window;

        let mut counters = self.counters.lock().await;
        let counter = counters.entry(ip).or_insert_with(|| RequestCounter::new(window));

        let used = counter.in_window(now);
        if used >= self.max_requests {
            Verdict::Reject { retry_after_secs: counter.retry_after(now) }
        } else {
            counter.account(now);
            Verdict::Admit { remaining: self.max_requests - used - 1 }
        }
    }
}
