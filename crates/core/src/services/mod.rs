//! Payload-derivation services.
//!
//! Leaf-first: `classify` -> `shebang` -> `requirement` -> `identity` -> `payload`.
//! External tools are reached only through the capability traits in `tools`;
//! `backends` holds the implementations that shell out to the real macOS utilities.

pub mod backends;
pub mod classify;
pub mod identity;
pub mod inspect;
pub mod payload;
pub mod requirement;
pub mod shebang;
pub mod signing;
pub mod tools;

/// Strip trailing `/` separators, keeping a lone root `/` intact.
pub fn strip_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}
