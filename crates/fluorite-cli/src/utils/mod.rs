//! Terminal utilities.

pub mod pause;

pub use pause::wait_for_key;
