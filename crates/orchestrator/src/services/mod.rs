//! Consumed service contracts and their in-memory doubles.

pub mod catalog;
pub mod identity;
