// Adapters layer: concrete implementations for external systems (HTTP façade,
// Firebase identity, files on disk).

pub mod export;
pub mod firebase;
pub mod http;
pub mod photo;
