//! Nested route transitions module.
//!
//! This module provides the router, route handlers, the transition
//! middleware and the outlet rendering collaborators.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "transitions")]
//! use reinhardt::transitions::{Router, RouterSettings};
//! ```

#[cfg(feature = "transitions")]
pub use reinhardt_transitions::*;
