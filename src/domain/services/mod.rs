//! Pure domain rules.

pub mod rut;

pub use rut::{Rut, check_digit, format_rut, validate_rut};
