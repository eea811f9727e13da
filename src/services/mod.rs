//! Searching and navigation services.
//!
//! These sit between the loaded [`Bible`](crate::corpus::Bible) and the
//! [`Session`](crate::session::Session): key normalisation, the search engine,
//! the occurrence navigator with its offset mapper, and history.

pub mod history;
pub mod key;
pub mod navigator;
pub mod offsets;
pub mod search;
