//! Polling runtime
//!
//! This module owns the fetch-aggregate-report cycle:
//!
//! - One fetcher task per (exchange, pair) combination
//! - A per-cycle JoinSet as the aggregation point, so the whole
//!   in-flight cycle can be cancelled as a group
//! - The scheduler loop driving cycles on a fixed cadence until
//!   an interrupt arrives
//!
//! Exchange-specific behavior never lives here; it is delegated
//! to `ExchangeClient` implementations resolved through the
//! `ClientFactory`.

pub mod runner;
