use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Name to replacement-text lookup used while rendering.
///
/// Lookups are exact and case-sensitive.
pub trait Model {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl<K, V, S> Model for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<K, V> Model for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<M: Model + ?Sized> Model for &M {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_lookup_is_case_sensitive() {
        let model = HashMap::from([("Tag".to_string(), "value".to_string())]);
        assert_eq!(model.lookup("Tag"), Some("value"));
        assert_eq!(model.lookup("tag"), None);
    }

    #[test]
    fn test_borrowed_keys_and_values() {
        let model = BTreeMap::from([("a", ""), ("b", "two")]);
        assert_eq!(model.lookup("a"), Some(""));
        assert_eq!((&model).lookup("b"), Some("two"));
        assert_eq!(model.lookup("c"), None);
    }
}
