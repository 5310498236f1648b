#![deny(missing_docs)]
//! Predicate vocabulary shared by colfilter's executor and table layers.
//!
//! A predicate here is always a single `column op literal` triple. Literals
//! follow SQL value typing (`NULL`, integer, double, string) and operators
//! cover ordered comparisons, null checks and `GLOB`. Nothing in this crate
//! knows how columns are stored; it only describes what to ask of them.

mod core;

pub use core::{Constraint, FilterOp, ScalarValue, ScalarValueRef, ValueType};
