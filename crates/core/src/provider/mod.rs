//! File-hosting provider abstraction.
//!
//! This module provides a `FileProvider` trait for the search API the
//! streams come from, and the Webshare implementation of it.

mod types;
mod webshare;

pub use types::*;
pub use webshare::{salt_password, WebshareClient};
