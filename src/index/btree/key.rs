//! Index keys and key coercion.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::common::{Error, Result};

/// A totally ordered numeric index key.
///
/// Wraps a finite `f64`. NaN and the infinities are rejected at construction,
/// and `-0.0` is folded into `0.0`, so the derived total order agrees with the
/// numeric order.
///
/// # Example
/// ```
/// use bplusdb::Key;
///
/// let a = Key::new(10.0).unwrap();
/// let b = Key::parse(" 20 ").unwrap();
/// assert!(a < b);
/// assert_eq!(b.to_string(), "20");
///
/// assert!(Key::parse("abc").is_err());
/// assert!(Key::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Key(f64);

impl Key {
    /// Create a key from a number.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` for NaN or infinite values.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidKey(value.to_string()));
        }
        // -0.0 and 0.0 must compare equal under total_cmp
        Ok(Key(if value == 0.0 { 0.0 } else { value }))
    }

    /// Parse a key from text, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` for empty or non-numeric text.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidKey(text.to_string()));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| Error::InvalidKey(text.to_string()))?;
        Key::new(value).map_err(|_| Error::InvalidKey(text.to_string()))
    }

    /// The numeric value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything the tree accepts as a key.
///
/// Numbers convert directly; text is parsed. Conversion failures surface as
/// `Error::InvalidKey` before the tree is touched.
pub trait AsKey {
    fn as_key(&self) -> Result<Key>;
}

impl AsKey for Key {
    fn as_key(&self) -> Result<Key> {
        Ok(*self)
    }
}

impl AsKey for f64 {
    fn as_key(&self) -> Result<Key> {
        Key::new(*self)
    }
}

impl AsKey for f32 {
    fn as_key(&self) -> Result<Key> {
        Key::new(f64::from(*self))
    }
}

macro_rules! impl_as_key_for_int {
    ($($t:ty),*) => {
        $(
            impl AsKey for $t {
                fn as_key(&self) -> Result<Key> {
                    Key::new(*self as f64)
                }
            }
        )*
    };
}

impl_as_key_for_int!(i32, i64, u32, u64, usize);

impl AsKey for str {
    fn as_key(&self) -> Result<Key> {
        Key::parse(self)
    }
}

impl AsKey for String {
    fn as_key(&self) -> Result<Key> {
        Key::parse(self)
    }
}

impl<T: AsKey + ?Sized> AsKey for &T {
    fn as_key(&self) -> Result<Key> {
        (**self).as_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(v: f64) -> Key {
        Key::new(v).unwrap()
    }

    #[test]
    fn test_key_ordering() {
        assert!(key(-1.5) < key(0.0));
        assert!(key(5.0) < key(10.0));
        assert_eq!(key(3.0), key(3.0));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert_eq!(key(-0.0), key(0.0));
        assert_eq!(key(-0.0).cmp(&key(0.0)), Ordering::Equal);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(Key::new(f64::NAN), Err(Error::InvalidKey(_))));
        assert!(Key::new(f64::INFINITY).is_err());
        assert!(Key::new(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Key::parse("123456789").unwrap(), key(123456789.0));
        assert_eq!(Key::parse("  42\n").unwrap(), key(42.0));
        assert_eq!(Key::parse("2.5").unwrap(), key(2.5));
        assert!(Key::parse("").is_err());
        assert!(Key::parse("   ").is_err());
        assert!(Key::parse("12a").is_err());
        assert!(Key::parse("NaN").is_err());
        assert!(Key::parse("inf").is_err());
    }

    #[test]
    fn test_invalid_key_keeps_original_text() {
        match Key::parse("ssn?") {
            Err(Error::InvalidKey(text)) => assert_eq!(text, "ssn?"),
            other => panic!("Expected InvalidKey, got {:?}", other),
        }
    }

    #[test]
    fn test_as_key_conversions() {
        assert_eq!(7i32.as_key().unwrap(), key(7.0));
        assert_eq!(7u64.as_key().unwrap(), key(7.0));
        assert_eq!("7".as_key().unwrap(), key(7.0));
        assert_eq!(String::from("7").as_key().unwrap(), key(7.0));
        assert_eq!((&7.0f64).as_key().unwrap(), key(7.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(key(10.0).to_string(), "10");
        assert_eq!(key(2.5).to_string(), "2.5");
    }
}
