//! Per-location admission and backoff state machine.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace, warn};

use super::bucket::SlidingWindow;
use crate::config::{ThrottleConfig, WindowLimit};
use crate::error::{FloodgateError, Result};
use crate::region::Location;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Status the service answers with when a budget is exceeded anyway.
const STATUS_TOO_MANY_REQUESTS: u16 = 429;
/// Header carrying the server's retry hint, in whole seconds.
const RETRY_AFTER: &str = "retry-after";
/// Diagnostic header reporting application-scope usage; never drives control flow.
const APP_USAGE: &str = "x-app-rate-limit-count";
/// Diagnostic header reporting method-scope usage; never drives control flow.
const METHOD_USAGE: &str = "x-method-rate-limit-count";

/// Outcome of one admission pass.
enum Admission {
    /// Capacity was reserved; the request may go out now.
    Ready,
    /// Come back once the instant has passed.
    Wait(Instant),
}

/// Admission-control state machine for a single location.
///
/// Tracks application-scope and method-scope usage, converts exhausted
/// budgets into waits, and folds server-issued retry hints back into its own
/// hold state. The whole decision pass runs under one mutex, so concurrent
/// callers for the same location cannot reserve past a budget, while
/// different locations proceed fully in parallel. The lock is never held
/// across a suspension point.
pub struct RegionLimiter {
    location: Location,
    margin: Duration,
    max_forced_retries: Option<u32>,
    method_limits: Vec<WindowLimit>,
    state: Mutex<LimiterState>,
}

/// Mutable limiter state, guarded by the per-location mutex.
struct LimiterState {
    app: Vec<SlidingWindow>,
    methods: HashMap<String, Vec<SlidingWindow>>,
    app_retry_at: Option<Instant>,
    method_retry_at: HashMap<String, Instant>,
}

impl RegionLimiter {
    /// Create a limiter for `location` with the given budgets.
    pub fn new(location: Location, config: &ThrottleConfig) -> Self {
        let margin = config.safety_margin();
        Self {
            location,
            margin,
            max_forced_retries: config.max_forced_retries,
            method_limits: config.method_limits.clone(),
            state: Mutex::new(LimiterState {
                app: build_buckets(&config.app_limits, margin),
                methods: HashMap::new(),
                app_retry_at: None,
                method_retry_at: HashMap::new(),
            }),
        }
    }

    /// The location this limiter serves.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Execute `request` once the budgets for `method` allow it.
    ///
    /// Exhausted budgets and server-forced backoff are waited out internally;
    /// the caller only ever sees a response or a genuine failure. `deadline`
    /// bounds the total time spent waiting and is checked at every suspension
    /// point.
    pub async fn dispatch<T>(
        &self,
        transport: &T,
        method: &str,
        request: &ApiRequest,
        deadline: Option<Instant>,
    ) -> Result<ApiResponse>
    where
        T: Transport + ?Sized,
    {
        let mut forced_retries: u32 = 0;
        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(FloodgateError::DeadlineExceeded);
            }

            let admission = {
                let mut state = self.state.lock();
                self.admit(&mut state, method)
            };
            if let Admission::Wait(until) = admission {
                debug!(
                    location = %self.location,
                    method,
                    wait_ms = (until - Instant::now()).as_millis() as u64,
                    "Budget exhausted, waiting"
                );
                self.suspend_until(until, deadline).await?;
                continue;
            }

            trace!(location = %self.location, method, url = %request.url, "Request admitted");
            let response = transport.execute(request).await?;

            if response.status == STATUS_TOO_MANY_REQUESTS {
                let hint = retry_hint(&response)?;
                forced_retries += 1;
                warn!(
                    location = %self.location,
                    method,
                    retry_after_secs = hint.as_secs(),
                    forced_retries,
                    app_usage = response.header(APP_USAGE).unwrap_or("-"),
                    method_usage = response.header(METHOD_USAGE).unwrap_or("-"),
                    "Rate limit exceeded upstream, backing off"
                );

                let until = {
                    let mut state = self.state.lock();
                    let until = Instant::now() + hint;
                    state.app_retry_at = Some(until);
                    until
                };
                if self.max_forced_retries.is_some_and(|cap| forced_retries > cap) {
                    return Err(FloodgateError::RetriesExhausted {
                        retries: forced_retries,
                    });
                }
                self.suspend_until(until + self.margin, deadline).await?;
                continue;
            }

            if !(200..300).contains(&response.status) {
                return Err(FloodgateError::Http {
                    status: response.status,
                    url: request.url.clone(),
                    body: response.body,
                });
            }
            return Ok(response);
        }
    }

    /// One admission pass for `method`, executed under the state lock.
    ///
    /// Either reserves capacity in every bucket of both scopes, or stores the
    /// computed ready-instant into the retry slot of exactly the scope(s)
    /// that reported a wait.
    fn admit(&self, state: &mut LimiterState, method: &str) -> Admission {
        let now = Instant::now();

        if let Some(at) = state.app_retry_at {
            if at > now {
                return Admission::Wait(at + self.margin);
            }
            state.app_retry_at = None;
        }
        if let Some(&at) = state.method_retry_at.get(method) {
            if at > now {
                return Admission::Wait(at + self.margin);
            }
            state.method_retry_at.remove(method);
        }

        let method_delay = state
            .methods
            .entry(method.to_string())
            .or_insert_with(|| build_buckets(&self.method_limits, self.margin))
            .iter_mut()
            .filter_map(SlidingWindow::delay)
            .max();
        let app_delay = state
            .app
            .iter_mut()
            .filter_map(SlidingWindow::delay)
            .max();

        if app_delay.is_some() || method_delay.is_some() {
            let mut wake = now;
            if let Some(delay) = app_delay {
                let until = now + delay;
                state.app_retry_at = Some(until);
                wake = wake.max(until);
            }
            if let Some(delay) = method_delay {
                let until = now + delay;
                state.method_retry_at.insert(method.to_string(), until);
                wake = wake.max(until);
            }
            return Admission::Wait(wake + self.margin);
        }

        for bucket in &mut state.app {
            bucket.record();
        }
        if let Some(buckets) = state.methods.get_mut(method) {
            for bucket in buckets {
                bucket.record();
            }
        }
        Admission::Ready
    }

    /// Sleep until `until`, or fail once `deadline` passes first.
    async fn suspend_until(&self, until: Instant, deadline: Option<Instant>) -> Result<()> {
        match deadline {
            Some(d) if d < until => {
                sleep_until(d).await;
                Err(FloodgateError::DeadlineExceeded)
            }
            _ => {
                sleep_until(until).await;
                Ok(())
            }
        }
    }
}

/// Instantiate one bucket per configured budget.
fn build_buckets(limits: &[WindowLimit], margin: Duration) -> Vec<SlidingWindow> {
    limits
        .iter()
        .map(|limit| SlidingWindow::new(limit.limit, limit.window(), margin))
        .collect()
}

/// Extract the mandatory retry hint from a rate-limited response.
fn retry_hint(response: &ApiResponse) -> Result<Duration> {
    let value = response
        .header(RETRY_AFTER)
        .ok_or_else(|| FloodgateError::RetryHint("header is missing".to_string()))?;
    let seconds: u64 = value.trim().parse().map_err(|_| {
        FloodgateError::RetryHint(format!("cannot parse {value:?} as whole seconds"))
    })?;
    Ok(Duration::from_secs(seconds))
}
