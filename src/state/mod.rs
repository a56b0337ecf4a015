//! State module for tracking pagination progress
//!
//! `PagerState` models the driver loop as an explicit state machine so that
//! every step of a paginated harvest can be validated and logged.

mod pager_state;

pub use pager_state::PagerState;
