use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use super::*;

/// A `MapFact<Key, Value>` is a wrapper type around a `BTreeMap<Key, Value>`
/// where the `Value` type is an abstract domain with a bottom element and the map itself is also an abstract domain.
///
/// Keys not present in the map have the bottom value associated to them.
/// To keep equality of maps consistent with the partial order,
/// bottom values are never stored in the map:
/// Updating a key to the bottom value removes the key.
/// Two maps are merged by merging the values of each key.
///
/// A `MapFact` has two main advantages over a regular `BTreeMap`:
/// * The map itself is wrapped into an `Arc<..>` to enable cheap cloning of `MapFacts`,
///   e.g. for keeping a snapshot of the old value of a fact around.
/// * The `MapFact` automatically implements the [`AbstractDomain`] trait.
///
/// Since a `MapFact` implements the `Deref` trait with target the inner `BTreeMap`,
/// it can be read just like a `BTreeMap`.
/// Note that [`MapFact::get`] shadows the `get` method of the map.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    inner: Arc<BTreeMap<K, V>>,
}

impl<K, V> MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    /// Create a new empty map, i.e. the bottom element.
    pub fn new() -> Self {
        MapFact {
            inner: Arc::new(BTreeMap::new()),
        }
    }

    /// Get the value associated to the key.
    /// Returns the bottom value for keys not present in the map.
    pub fn get(&self, key: &K) -> V {
        self.inner.get(key).cloned().unwrap_or_else(V::bottom)
    }

    /// Associate `value` to `key`. Returns `true` if the map changed.
    pub fn update(&mut self, key: K, value: V) -> bool {
        if value == V::bottom() {
            return self.remove(&key).is_some();
        }
        if self.inner.get(&key) == Some(&value) {
            return false;
        }
        Arc::make_mut(&mut self.inner).insert(key, value);
        true
    }

    /// Remove the key from the map (i.e. reset its value to bottom) and return the old value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if self.inner.contains_key(key) {
            Arc::make_mut(&mut self.inner).remove(key)
        } else {
            None
        }
    }

    /// Replace the content of `self` with the content of `other`.
    /// Returns `true` if `self` changed.
    pub fn copy_from(&mut self, other: &Self) -> bool {
        if self == other {
            false
        } else {
            self.inner = other.inner.clone();
            true
        }
    }
}

impl<K, V> Default for MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    fn default() -> Self {
        MapFact::new()
    }
}

impl<K, V> Deref for MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    type Target = BTreeMap<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<K, V> FromIterator<(K, V)> for MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    /// Generate a new `MapFact` from an iterator over the key-value pairs that it should contain.
    /// Pairs with bottom values are skipped.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let bottom = V::bottom();
        MapFact {
            inner: Arc::new(
                iter.into_iter()
                    .filter(|(_, value)| *value != bottom)
                    .collect(),
            ),
        }
    }
}

impl<K, V> AbstractDomain for MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    /// Merge two maps key by key.
    /// Keys only present in one of the maps keep their value.
    fn meet(&self, other: &Self) -> Self {
        if self == other {
            self.clone()
        } else {
            let mut merged_map = (*self.inner).clone();
            for (key, value_right) in other.inner.iter() {
                merged_map
                    .entry(key.clone())
                    .and_modify(|value| {
                        *value = value.meet(value_right);
                    })
                    .or_insert_with(|| value_right.clone());
            }
            MapFact {
                inner: Arc::new(merged_map),
            }
        }
    }

    fn meet_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (key, value_right) in other.inner.iter() {
            let merged_value = self.get(key).meet(value_right);
            changed |= self.update(key.clone(), merged_value);
        }
        changed
    }

    /// The map has no top element since the set of keys is unbounded.
    fn is_top(&self) -> bool {
        false
    }
}

impl<K, V> HasBottom for MapFact<K, V>
where
    K: Ord + Clone,
    V: AbstractDomain + HasBottom,
{
    fn bottom() -> Self {
        MapFact::new()
    }
}

impl<K, V> Display for MapFact<K, V>
where
    K: Ord + Clone + Display,
    V: AbstractDomain + HasBottom + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: Vec<String> = self
            .inner
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> MapFact<String, Value> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn absent_keys_are_bottom() {
        let mut fact = map(&[("x", Value::Constant(1)), ("y", Value::Undef)]);
        assert_eq!(fact.len(), 1);
        assert_eq!(fact.get(&"y".to_string()), Value::Undef);
        assert!(!fact.update("y".to_string(), Value::Undef));
        assert!(fact.update("x".to_string(), Value::Undef));
        assert_eq!(fact, MapFact::new());
    }

    #[test]
    fn update_and_snapshots() {
        let mut fact = map(&[("x", Value::Constant(1))]);
        let snapshot = fact.clone();
        assert!(!fact.update("x".to_string(), Value::Constant(1)));
        assert!(fact.update("x".to_string(), Value::Nac));
        assert_eq!(snapshot.get(&"x".to_string()), Value::Constant(1));
        assert_eq!(fact.get(&"x".to_string()), Value::Nac);
    }

    #[test]
    fn meet_merges_values_per_key() {
        let left = map(&[("x", Value::Constant(1)), ("y", Value::Constant(2))]);
        let right = map(&[("y", Value::Constant(3)), ("z", Value::Constant(4))]);
        let expected = map(&[
            ("x", Value::Constant(1)),
            ("y", Value::Nac),
            ("z", Value::Constant(4)),
        ]);
        assert_eq!(left.meet(&right), expected);
        assert_eq!(right.meet(&left), expected);
        assert_eq!(MapFact::bottom().meet(&left), left);

        let mut accumulator = left.clone();
        assert!(accumulator.meet_with(&right));
        assert_eq!(accumulator, expected);
        assert!(!accumulator.meet_with(&right));
        assert!(left.is_less_or_equal(&expected));
        assert_eq!(left.to_string(), "{x=1, y=2}");
    }
}
