//! Core types and traits for the Shortly URL shortener.
//!
//! This crate holds the base36 identifier codec, the [`ShortToken`] type and
//! the [`LinkStore`] contract that storage backends implement.

pub mod base36;
pub mod error;
pub mod store;
pub mod token;

pub use error::{CoreError, StoreError};
pub use store::{LinkDetails, LinkStore};
pub use token::ShortToken;
