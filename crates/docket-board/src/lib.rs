//! docket-board library.
//!
//! The board presenter: partitions a demand collection into per-status
//! columns, exposes the static action-affordance table, and owns the
//! authoritative collection behind a snapshot-and-replace [`board::Board`]
//! controller.

pub mod actions;
pub mod board;

pub use actions::{BoardAction, offered_actions};
pub use board::{Board, IdResolution};
