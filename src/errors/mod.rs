//! Centralized error handling for the Antennas service
//!
//! # Error Categories
//!
//! - **Configuration Errors**: missing or invalid settings, fatal at startup
//! - **Backend Errors**: Tvheadend transport, authentication and payload failures,
//!   recoverable and scoped to a single request or page
//! - **Guide Errors**: failures writing or replacing the guide artifact
//!
//! # Usage
//!
//! ```rust
//! use antennas::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for backend Results
pub type BackendResult<T> = Result<T, BackendError>;
