//! Vector store tests
//!
//! Qdrant REST client against a mock HTTP server, and collection
//! provisioning against the in-memory store.
