/// State management module
///
/// This module holds the try-on model:
/// - Catalog entries and image references (data.rs)
/// - Style catalog with cyclic selection (catalog.rs)
/// - Overlay placement transform (transform.rs)
/// - Session scope and catalog source strategy (session.rs)

pub mod catalog;
pub mod data;
pub mod session;
pub mod transform;
