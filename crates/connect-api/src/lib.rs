//! # connect-api
//!
//! The HTTP boundary for BCET Connect: routes, handlers, extractors,
//! DTOs, error mapping, and the WebSocket upgrade for live delivery.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
