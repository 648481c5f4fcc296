//! Request middleware.

pub mod referrer_filter;

pub use referrer_filter::referrer_filter_middleware;
