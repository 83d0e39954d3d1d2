//! docket-core library.
//!
//! Core model and engines for the docket demand board: the [`model`] of a
//! demand and its status/priority vocabulary, the [`transition`] engine with
//! exactly-once timestamp capture, the [`query`] filter/sort engine, the
//! [`duration`] formatter, and the local JSON [`store`].
//!
//! # Conventions
//!
//! - **Errors**: typed [`error`] values inside the crate, `anyhow::Result`
//!   with context at binary boundaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod duration;
pub mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod timing;
pub mod transition;
