//! Interned identifiers for node keys and region paths.
//!
//! Every node in a diagram is addressed by a key that is unique across the
//! whole diagram, and every region by its path from the root
//! (`"VPC::Public Subnet"`). Both are stored as [`Id`], a `Copy` handle into a
//! process-wide string interner, so that lookups during edge resolution hash a
//! single integer instead of a string.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator placed between region labels in a region path.
pub const PATH_SEPARATOR: &str = "::";

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned identifier used for node keys and region paths.
///
/// # Examples
///
/// ```
/// use rampart_core::identifier::Id;
///
/// let waf = Id::new("waf");
/// assert_eq!(waf, "waf");
///
/// let vpc = Id::new("VPC");
/// let subnet = vpc.create_nested(Id::new("Public Subnet"));
/// assert_eq!(subnet, "VPC::Public Subnet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the path of a child scope below `self`, joined with
    /// [`PATH_SEPARATOR`].
    pub fn create_nested(&self, child_id: Id) -> Self {
        let mut interner = interner();
        let nested = format!(
            "{}{PATH_SEPARATOR}{}",
            interner.resolve(self.0).unwrap_or_default(),
            interner.resolve(child_id.0).unwrap_or_default(),
        );
        Self(interner.get_or_intern(nested))
    }

    /// Returns an owned copy of the interned string.
    pub fn to_owned_string(&self) -> String {
        interner().resolve(self.0).unwrap_or_default().to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Resolve before writing so the lock is not held across the formatter.
        let value = self.to_owned_string();
        f.write_str(&value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interns_once() {
        let a = Id::new("route53");
        let b = Id::new("route53");
        let c = Id::new("shield");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "route53");
    }

    #[test]
    fn test_create_nested_path() {
        let vpc = Id::new("VPC");
        let public = vpc.create_nested(Id::new("Public Subnet"));
        let private = vpc.create_nested(Id::new("Private Subnet"));

        assert_ne!(public, private);
        assert_eq!(public, "VPC::Public Subnet");
        assert_eq!(private, "VPC::Private Subnet");
    }

    #[test]
    fn test_labels_with_newlines_survive() {
        let id = Id::new("Development\nShift-Left Security");
        assert_eq!(id.to_string(), "Development\nShift-Left Security");
    }

    #[test]
    fn test_from_string_ref() {
        let key = String::from("eventbridge");
        let id: Id = (&key).into();
        assert_eq!(id, Id::new("eventbridge"));
    }

    #[test]
    fn test_hash_map_lookup() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("lambda"), 1);
        map.insert(Id::new("slack"), 2);

        assert_eq!(map.get(&Id::new("lambda")), Some(&1));
        assert_eq!(map.len(), 2);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Interning is injective and lossless for arbitrary labels.
    fn check_interning_round_trip(a: &str, b: &str) -> Result<(), TestCaseError> {
        let (id_a, id_b) = (Id::new(a), Id::new(b));
        prop_assert_eq!(id_a.to_owned_string(), a);
        prop_assert_eq!(id_a == id_b, a == b);
        Ok(())
    }

    /// A nested path is the parent path, the separator and the child label.
    fn check_nested_path(parent: &str, child: &str) -> Result<(), TestCaseError> {
        let nested = Id::new(parent).create_nested(Id::new(child));
        prop_assert_eq!(nested.to_string(), format!("{parent}{PATH_SEPARATOR}{child}"));
        Ok(())
    }

    proptest! {
        #[test]
        fn interning_round_trip(a in "\\PC{0,16}", b in "\\PC{0,16}") {
            check_interning_round_trip(&a, &b)?;
        }

        #[test]
        fn nested_path(parent in "[A-Za-z ]{1,12}", child in "[A-Za-z ]{1,12}") {
            check_nested_path(&parent, &child)?;
        }
    }
}
