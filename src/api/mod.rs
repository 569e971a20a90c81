//! HTTP surface: router construction and the user endpoints.
//!
//! The store never leaks through this layer as an implementation detail —
//! handlers receive a [`DocStore`](crate::DocStore) handle as axum state and
//! go through the same five operations as any other caller.

pub mod docs;
pub mod handlers;
pub mod server;
