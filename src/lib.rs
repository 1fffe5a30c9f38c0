#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod app;
pub mod board;
pub mod cm55;
pub mod config;
pub mod console;
pub mod error;
pub mod psa;
pub mod relay;
pub mod status;
pub mod token;

pub use app::{App, Platform, halt};
pub use config::Config;
pub use error::{Error, Result};
pub use token::TokenBuffer;
