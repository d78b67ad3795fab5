//! Keyframe steps keyed by percentage.

/// CSS value(s) applied at one keyframe percentage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum StepValue {
    /// A single property value
    One(String),
    /// Several values for the same property, emitted in order
    Many(Vec<String>),
}

impl StepValue {
    /// The value used for a synthesized 0% step.
    pub fn inherit() -> Self {
        StepValue::Many(vec!["inherit".to_string(), "0".to_string()])
    }

    /// All values of this step as a slice.
    pub fn values(&self) -> &[String] {
        match self {
            StepValue::One(value) => std::slice::from_ref(value),
            StepValue::Many(values) => values,
        }
    }
}

impl From<&str> for StepValue {
    fn from(value: &str) -> Self {
        StepValue::One(value.to_string())
    }
}

impl From<String> for StepValue {
    fn from(value: String) -> Self {
        StepValue::One(value)
    }
}

impl From<Vec<String>> for StepValue {
    fn from(values: Vec<String>) -> Self {
        StepValue::Many(values)
    }
}

impl<const N: usize> From<[&str; N]> for StepValue {
    fn from(values: [&str; N]) -> Self {
        StepValue::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Steps ordered by ascending percentage.
///
/// Keys are plain `f64`s and may fall outside `0..=100` once an animation
/// has been synced. Inserting an existing key replaces its value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMap {
    entries: Vec<(f64, StepValue)>,
}

impl StepMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a step, replacing any step at exactly the same key.
    ///
    /// NaN keys have no position and are dropped.
    pub fn insert(&mut self, key: f64, value: StepValue) {
        if key.is_nan() {
            return;
        }
        // Fold -0 into 0 so lookups for the 0% step find it.
        let key = if key == 0.0 { 0.0 } else { key };
        let idx = self.entries.partition_point(|(k, _)| *k < key);
        match self.entries.get_mut(idx) {
            Some(entry) if entry.0 == key => entry.1 = value,
            _ => self.entries.insert(idx, (key, value)),
        }
    }

    /// Get the step at exactly `key`.
    pub fn get(&self, key: f64) -> Option<&StepValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Check whether a step sits at exactly `key`.
    #[inline]
    pub fn contains(&self, key: f64) -> bool {
        self.get(key).is_some()
    }

    /// The step with the smallest key.
    #[inline]
    pub fn first(&self) -> Option<(f64, &StepValue)> {
        self.entries.first().map(|(k, v)| (*k, v))
    }

    /// The step with the largest key.
    #[inline]
    pub fn last(&self) -> Option<(f64, &StepValue)> {
        self.entries.last().map(|(k, v)| (*k, v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate steps in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &StepValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Iterate keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Map every key through `key * ratio + shift`.
    ///
    /// Steps are moved in ascending order of their original key, so when two
    /// keys land on the same percentage the higher original wins.
    pub fn rescale(&self, ratio: f64, shift: f64) -> StepMap {
        let mut rescaled = StepMap::new();
        for (key, value) in &self.entries {
            rescaled.insert(key * ratio + shift, value.clone());
        }
        rescaled
    }

    /// Make sure the 0% and 100% steps exist.
    ///
    /// A missing 0% becomes `inherit, 0`; a missing 100% copies the value at
    /// the largest key.
    pub fn ensure_bounds(&mut self) {
        if !self.contains(0.0) {
            self.insert(0.0, StepValue::inherit());
        }
        if !self.contains(100.0) {
            if let Some((_, last)) = self.last() {
                let last = last.clone();
                self.insert(100.0, last);
            }
        }
    }
}

impl FromIterator<(f64, StepValue)> for StepMap {
    fn from_iter<I: IntoIterator<Item = (f64, StepValue)>>(iter: I) -> Self {
        let mut map = StepMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order() {
        let mut map = StepMap::new();
        map.insert(100.0, "c".into());
        map.insert(0.0, "a".into());
        map.insert(50.0, "b".into());

        assert_eq!(map.keys().collect::<Vec<_>>(), vec![0.0, 50.0, 100.0]);
        assert_eq!(map.first().map(|(k, _)| k), Some(0.0));
        assert_eq!(map.last().map(|(k, _)| k), Some(100.0));
    }

    #[test]
    fn insert_replaces_same_key() {
        let mut map = StepMap::new();
        map.insert(50.0, "old".into());
        map.insert(50.0, "new".into());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(50.0), Some(&StepValue::from("new")));
    }

    #[test]
    fn negative_zero_and_nan() {
        let mut map = StepMap::new();
        map.insert(-0.0, "zero".into());
        map.insert(f64::NAN, "nan".into());
        assert_eq!(map.len(), 1);
        assert!(map.contains(0.0));
    }

    #[test]
    fn rescale_collision_last_wins() {
        let map: StepMap = [(0.0, StepValue::from("a")), (10.0, StepValue::from("b"))]
            .into_iter()
            .collect();
        let squashed = map.rescale(0.0, 5.0);
        assert_eq!(squashed.len(), 1);
        assert_eq!(squashed.get(5.0), Some(&StepValue::from("b")));
    }

    #[test]
    fn ensure_bounds_fills_missing() {
        let mut map: StepMap = [(25.0, StepValue::from("a")), (75.0, StepValue::from("b"))]
            .into_iter()
            .collect();
        map.ensure_bounds();

        assert_eq!(map.get(0.0), Some(&StepValue::inherit()));
        assert_eq!(map.get(100.0), Some(&StepValue::from("b")));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn values_slice() {
        assert_eq!(StepValue::from("red").values(), ["red".to_string()]);
        assert_eq!(StepValue::inherit().values().len(), 2);
    }
}
