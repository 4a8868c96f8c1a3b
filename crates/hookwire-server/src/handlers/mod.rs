//! Route handlers

pub mod hook;
