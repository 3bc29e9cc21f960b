//! Core library for the `widget-loader` CLI.
//!
//! A fixed pool of workers posts randomized widgets to a target's
//! `/rpc/add_widget` endpoint, reports each request's latency to a metrics
//! sink (ILP line protocol over TCP, or a Prometheus text push), and an
//! aggregator logs running throughput and average latency until shutdown.
pub mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod payload;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod sinks;

#[cfg(test)]
mod test_support;
