//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the document store for metadata and the object storage proxy for file content.

pub mod documents;
pub mod storage;
