//! Modules layer - adapters for the external collaborators
//!
//! Contains the object store client that holds photo bytes.

pub mod storage;
