/// Asset loading module
///
/// This module handles:
/// - Fetching the remote catalog and style images (remote.rs)
/// - Picking and decoding custom uploads (upload.rs)

pub mod remote;
pub mod upload;
