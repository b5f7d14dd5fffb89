//! Wire message definitions for the live channel.

pub mod types;
