//! Admission control: sliding-window budgets, per-location limiters, routing.

mod bucket;
mod limiter;
mod registry;

pub use bucket::SlidingWindow;
pub use limiter::RegionLimiter;
pub use registry::ThrottleRegistry;
