//! Rooftop solar potential and amortization calculator.
//!
//! A roof outline drawn as geographic points is validated and measured, sized
//! into a panel array, turned into an annual yield estimate, and projected as
//! a yearly cash flow with a payback year.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod finance;
pub mod geometry;
pub mod io;
pub mod pv;
pub mod quote;
pub mod report;
pub mod session;

pub use error::CalcError;
