// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{ServeOverrides, apply_overrides, classify_line, resolve_config_path};
