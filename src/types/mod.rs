//! Shared types for the HTTP layer.

pub mod response;

pub use response::Envelope;
