// codectx/src/commands/mod.rs
//! Command implementations.

pub mod extract;
