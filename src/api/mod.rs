//! Resume server client and types.
//!
//! This module provides the interface for communicating with the resume
//! endpoints of the server.

pub mod auth;
mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::ResumeClient;
pub use types::{ResumeId, ResumeSummary};
