// src/services/mod.rs
//! Business logic: the identity registrar, credential anchor, recovery
//! coordinator, and payment helper.

pub mod anchor;
pub mod payments;
pub mod recovery;
pub mod registrar;
