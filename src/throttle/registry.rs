//! Routing of calls to per-location limiters.

use std::collections::HashMap;

use tokio::time::Instant;
use tracing::info;

use super::limiter::RegionLimiter;
use crate::config::ThrottleConfig;
use crate::error::{FloodgateError, Result};
use crate::region::Location;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Owns one [`RegionLimiter`] per location and routes each call to it.
///
/// The mapping is built once and never changes afterwards; only the limiters'
/// internal state mutates, so concurrent lookups need no synchronization.
/// Shared across callers behind an `Arc`.
pub struct ThrottleRegistry {
    limiters: HashMap<Location, RegionLimiter>,
}

impl ThrottleRegistry {
    /// Build a limiter for every known location from one configuration.
    pub fn new(config: &ThrottleConfig) -> Result<Self> {
        config.validate()?;
        let limiters: HashMap<_, _> = Location::all()
            .map(|location| (location, RegionLimiter::new(location, config)))
            .collect();
        info!(locations = limiters.len(), "Throttle registry initialized");
        Ok(Self { limiters })
    }

    /// Dispatch `request` through the limiter for `location`.
    pub async fn dispatch<T>(
        &self,
        transport: &T,
        location: Location,
        method: &str,
        request: &ApiRequest,
    ) -> Result<ApiResponse>
    where
        T: Transport + ?Sized,
    {
        self.dispatch_until(transport, location, method, request, None)
            .await
    }

    /// Like [`ThrottleRegistry::dispatch`], with a deadline bounding every
    /// wait along the way.
    pub async fn dispatch_until<T>(
        &self,
        transport: &T,
        location: Location,
        method: &str,
        request: &ApiRequest,
        deadline: Option<Instant>,
    ) -> Result<ApiResponse>
    where
        T: Transport + ?Sized,
    {
        let limiter = self
            .limiters
            .get(&location)
            .ok_or(FloodgateError::UnknownLocation(location))?;
        limiter.dispatch(transport, method, request, deadline).await
    }

    /// Number of registered locations.
    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    /// Whether the registry holds no limiters.
    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}
