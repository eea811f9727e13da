//! `Lectern` - Bible reference resolution, search and navigation.
//!
//! This crate resolves free-form references like `gen ii.3` to verse
//! positions, searches the text in six modes, steps through matches with
//! display-ready highlights, and keeps back/forward history for a reading
//! [`Session`](session::Session).

// Re-export public modules for use in integration tests and as a library
pub mod bible;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod error;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;
