//! Weighted selection.
//!
//! A pure function of catalog and random source. Callers must gate on a
//! non-empty catalog; an empty one is reported as an
//! [`InvariantViolation`](crate::error::InvariantViolation).

mod weighted;

pub use weighted::{select, select_index};
