//! Service adapters for the Roamer trip planner.
//!
//! Responsibilities:
//! - Implement the `roamer-core` service traits over HTTP.
//! - Decode the services' wire formats into core types.
//!
//! Boundaries:
//! - Do not encode coordination rules (live in `roamer-core`).
//! - No retries; callers decide what to do with a failure.

pub mod http;
