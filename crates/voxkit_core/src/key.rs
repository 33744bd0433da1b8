//! Stable string keys derived from Rust type names
//!
//! Keys are what a persisted snapshot stores to find its way back to a
//! registered factory. The escaping is reversible:
//! - ASCII alphanumerics and `_` are kept as-is
//! - every `::` path separator becomes `.`
//! - any other character becomes `$<lowercase hex code point>;`

use core::fmt::Write;

use crate::error::{Error, Result};

/// Escape a fully qualified type name into a key
pub fn escape_type_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            key.push('.');
        } else if c.is_ascii_alphanumeric() || c == '_' {
            key.push(c);
        } else {
            // Writing to a String cannot fail
            let _ = write!(key, "${:x};", c as u32);
        }
    }

    key
}

/// Reverse [`escape_type_name`]
pub fn unescape_type_name(key: &str) -> Result<String> {
    let mut name = String::with_capacity(key.len() + 8);
    let mut chars = key.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => name.push_str("::"),
            '$' => {
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some(';') => break,
                        Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                        _ => return Err(malformed(key)),
                    }
                }
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| malformed(key))?;
                name.push(decoded);
            }
            c if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
            _ => return Err(malformed(key)),
        }
    }

    Ok(name)
}

/// The registry key for a type
pub fn type_key<T: ?Sized + 'static>() -> String {
    escape_type_name(core::any::type_name::<T>())
}

fn malformed(key: &str) -> Error {
    Error::MalformedKey(key.into())
}
