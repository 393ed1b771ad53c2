//! # Shooter Client Library
//!
//! Client-side core for the top-down multiplayer shooter: it keeps the
//! latest authoritative snapshot from the server, maps the fixed
//! 1920x1080 logical space onto the live window, samples keyboard and
//! mouse input, and pushes full input state upstream on every relevant
//! change.
//!
//! ## Module Organization
//!
//! - [`state`] — the snapshot buffer and local identity; mutated only
//!   by the connection pump and lifecycle transitions.
//! - [`network`] — the WebSocket channel; reader/writer tasks on the
//!   tokio runtime, drained into the store once per frame.
//! - [`input`] — input state ownership, change-triggered sends, the
//!   100 ms fire pulse.
//! - [`mapping`] — logical space to viewport conversion.
//! - [`rendering`] — the per-frame scene painter.
//! - [`upgrades`] — optimistic skill-point spending.
//! - [`auth`] — register/login against the HTTP auth service.
//!
//! The design deliberately avoids client-side prediction: snapshots
//! replace local state wholesale and the server is authoritative for
//! everything, including fire timing.

pub mod auth;
pub mod input;
pub mod mapping;
pub mod network;
pub mod rendering;
pub mod state;
pub mod upgrades;
