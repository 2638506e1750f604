//! Shared identifier for type, interface, and method names.
//!
//! Resolution runs against names that come from declarations loaded at
//! module-load time and from values built by the evaluator. Both sides hold
//! the same `Name`, so cloning must be cheap and comparison must be by content.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Reference-counted identifier.
///
/// Hashing and equality delegate to the string content, so a `Name` can be
/// looked up in a map with a plain `&str` key via `Borrow<str>`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Name(Arc<str>);

impl Name {
    /// Create a name from any string-like value.
    #[inline]
    pub fn new(s: impl AsRef<str>) -> Self {
        Name(Arc::from(s.as_ref()))
    }

    /// Borrow the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this looks like an implicit generic placeholder (`T`, `U`, ...).
    ///
    /// A single uppercase ASCII letter in a template position is treated as a
    /// generic parameter even when the impl does not declare it.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        let bytes = self.0.as_bytes();
        bytes.len() == 1 && bytes[0].is_ascii_uppercase()
    }

    /// Whether this is the `Self` receiver placeholder.
    #[inline]
    pub fn is_self_type(&self) -> bool {
        &*self.0 == "Self"
    }
}

impl Deref for Name {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Name {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    #[inline]
    fn from(s: &str) -> Self {
        Name(Arc::from(s))
    }
}

impl From<String> for Name {
    #[inline]
    fn from(s: String) -> Self {
        Name(Arc::from(s))
    }
}

impl From<&Name> for Name {
    #[inline]
    fn from(n: &Name) -> Self {
        n.clone()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
