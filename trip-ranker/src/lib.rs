//! Trip plan ranking server.
//!
//! Turns the transit backend's trip-planner output into typed plans,
//! ranks them for presentation, and serves the result over HTTP.

pub mod cache;
pub mod domain;
pub mod planner;
pub mod transit;
pub mod web;
