//! # Township Development Tools
//!
//! Command-line tools for development:
//! - Content and configuration validator
//! - Scripted session runner

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod simulate;
pub mod validate;
