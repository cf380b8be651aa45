//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked into the
//! interner's own storage and handed out as stable `&str` borrows for the
//! interner's lifetime.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternerInner {
    /// Map from string content to index in `strings`.
    map: FxHashMap<Box<str>, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<Box<str>>,
}

/// String interner.
///
/// One interner is created per parse invocation; it is not shared across
/// parses, which keeps `Name` handles meaningful only within the invocation
/// that produced them.
///
/// # Thread Safety
/// Uses an `RwLock` so a shared reference suffices for interning; a parse
/// holds `&StringInterner` throughout.
pub struct StringInterner {
    inner: RwLock<InternerInner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert(Box::from(""), 0);
        StringInterner {
            inner: RwLock::new(InternerInner {
                map,
                strings: vec![Box::from("")],
            }),
        }
    }

    /// Intern a string, returning its handle.
    ///
    /// Interning the same content twice returns the same handle.
    pub fn intern(&self, s: &str) -> Name {
        {
            let guard = self.inner.read();
            if let Some(&index) = guard.map.get(s) {
                return Name::from_index(index);
            }
        }

        let mut guard = self.inner.write();
        // Double-check after acquiring the write lock.
        if let Some(&index) = guard.map.get(s) {
            return Name::from_index(index);
        }

        let index = u32::try_from(guard.strings.len()).unwrap_or(u32::MAX);
        guard.strings.push(Box::from(s));
        guard.map.insert(Box::from(s), index);
        Name::from_index(index)
    }

    /// Look up the string content for a handle.
    ///
    /// Returns the empty string for handles this interner did not produce.
    pub fn lookup(&self, name: Name) -> String {
        let guard = self.inner.read();
        guard
            .strings
            .get(name.index())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.lookup(a), "foo");
        assert_eq!(interner.lookup(c), "bar");
    }

    #[test]
    fn unknown_handle_looks_up_empty() {
        let interner = StringInterner::new();
        let other = StringInterner::new();
        let far = other.intern("onlyhere");
        let _ = far;
        assert_eq!(interner.lookup(Name::from_index(99)), "");
    }
}
