//! Keyed read-only tables produced by the metric engine.
//!
//! Values are stored densely, indexed by position in the feature vocabulary and
//! the class universe. Lookups by name go through a shared [`Vocabulary`].

use std::collections::HashMap;
use std::sync::Arc;

/// Ordered list of names with a reverse index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary keeping the given order. On duplicated names, lookups
    /// resolve to the first occurrence.
    pub fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    /// Distinct labels in ascending order.
    pub fn sorted_distinct<'a>(labels: impl IntoIterator<Item = &'a String>) -> Self {
        let mut names: Vec<String> = labels.into_iter().cloned().collect();
        names.sort();
        names.dedup();
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// First name whose position is taken by an earlier occurrence.
    pub fn first_duplicate(&self) -> Option<&str> {
        self.names
            .iter()
            .enumerate()
            .find(|(idx, name)| self.positions.get(name.as_str()) != Some(idx))
            .map(|(_, name)| name.as_str())
    }
}

/// One value per feature.
#[derive(Debug, Clone)]
pub struct FeatureTable<T> {
    features: Arc<Vocabulary>,
    values: Vec<T>,
}

impl<T: Copy> FeatureTable<T> {
    pub(crate) fn new(features: Arc<Vocabulary>, values: Vec<T>) -> Self {
        debug_assert_eq!(features.len(), values.len());
        Self { features, values }
    }

    pub fn get(&self, feature: &str) -> Option<T> {
        self.features.position(feature).map(|f| self.values[f])
    }

    /// Value at a feature position.
    pub fn at(&self, feature: usize) -> T {
        self.values[feature]
    }

    /// Values in feature vocabulary order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.features
            .names()
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| (name.as_str(), *value))
    }

    pub fn to_map(&self) -> HashMap<String, T> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

/// One value per (feature, class) pair, fully populated.
#[derive(Debug, Clone)]
pub struct FeatureClassTable<T> {
    features: Arc<Vocabulary>,
    classes: Arc<Vocabulary>,
    values: Vec<T>,
}

impl<T: Copy> FeatureClassTable<T> {
    /// `values` is row-major: all classes of feature 0, then feature 1, ...
    pub(crate) fn new(features: Arc<Vocabulary>, classes: Arc<Vocabulary>, values: Vec<T>) -> Self {
        debug_assert_eq!(features.len() * classes.len(), values.len());
        Self {
            features,
            classes,
            values,
        }
    }

    pub(crate) fn from_fn(
        features: Arc<Vocabulary>,
        classes: Arc<Vocabulary>,
        mut value: impl FnMut(usize, usize) -> T,
    ) -> Self {
        let mut values = Vec::with_capacity(features.len() * classes.len());
        for f in 0..features.len() {
            for c in 0..classes.len() {
                values.push(value(f, c));
            }
        }
        Self::new(features, classes, values)
    }

    pub fn get(&self, feature: &str, classe: &str) -> Option<T> {
        let f = self.features.position(feature)?;
        let c = self.classes.position(classe)?;
        Some(self.at(f, c))
    }

    /// Value at (feature position, class position).
    pub fn at(&self, feature: usize, classe: usize) -> T {
        self.values[feature * self.classes.len() + classe]
    }

    /// Values of one feature, in class universe order.
    pub fn row(&self, feature: &str) -> Option<&[T]> {
        let f = self.features.position(feature)?;
        Some(self.row_at(f))
    }

    pub fn row_at(&self, feature: usize) -> &[T] {
        let width = self.classes.len();
        &self.values[feature * width..(feature + 1) * width]
    }

    /// Values of one class, in feature vocabulary order.
    pub fn column(&self, classe: &str) -> Option<Vec<T>> {
        let c = self.classes.position(classe)?;
        Some((0..self.features.len()).map(|f| self.at(f, c)).collect())
    }

    /// `(feature, classe, value)` in feature then class order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, T)> + '_ {
        let width = self.classes.len();
        self.values.iter().enumerate().map(move |(idx, value)| {
            (
                self.features.names()[idx / width].as_str(),
                self.classes.names()[idx % width].as_str(),
                *value,
            )
        })
    }

    pub fn to_map(&self) -> HashMap<String, HashMap<String, T>> {
        let mut out: HashMap<String, HashMap<String, T>> =
            HashMap::with_capacity(self.features.len());
        for (f, feature) in self.features.names().iter().enumerate() {
            let row = self
                .classes
                .names()
                .iter()
                .zip(self.row_at(f).iter())
                .map(|(classe, value)| (classe.clone(), *value))
                .collect();
            out.entry(feature.clone()).or_insert(row);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sorted_distinct_orders_and_dedups() {
        let labels = names(&["b", "a", "b", "c", "a"]);
        let vocab = Vocabulary::sorted_distinct(&labels);
        assert_eq!(vocab.names(), &names(&["a", "b", "c"])[..]);
        assert_eq!(vocab.position("c"), Some(2));
        assert!(!vocab.contains("d"));
    }

    #[test]
    fn first_duplicate_reports_the_repeated_name() {
        assert_eq!(Vocabulary::new(names(&["x", "y", "z"])).first_duplicate(), None);
        let vocab = Vocabulary::new(names(&["x", "y", "x", "y"]));
        assert_eq!(vocab.first_duplicate(), Some("x"));
        assert_eq!(vocab.position("x"), Some(0));
    }

    #[test]
    fn feature_class_table_lookups() {
        let features = Arc::new(Vocabulary::new(names(&["x", "y"])));
        let classes = Arc::new(Vocabulary::new(names(&["A", "B", "C"])));
        let table = FeatureClassTable::from_fn(features, classes, |f, c| (f * 10 + c) as f64);

        assert_eq!(table.get("y", "B"), Some(11.0));
        assert_eq!(table.get("z", "B"), None);
        assert_eq!(table.get("x", "Z"), None);
        assert_eq!(table.row("x"), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(table.column("C"), Some(vec![2.0, 12.0]));

        let triples: Vec<(&str, &str, f64)> = table.iter().collect();
        assert_eq!(triples.len(), 6);
        assert_eq!(triples[4], ("y", "B", 11.0));

        let map = table.to_map();
        assert_eq!(map["x"]["C"], 2.0);
        assert_eq!(map["y"].len(), 3);
    }

    #[test]
    fn feature_table_keeps_vocabulary_order() {
        let features = Arc::new(Vocabulary::new(names(&["b", "a"])));
        let table = FeatureTable::new(features, vec![true, false]);
        let ordered: Vec<(&str, bool)> = table.iter().collect();
        assert_eq!(ordered, vec![("b", true), ("a", false)]);
        assert_eq!(table.get("a"), Some(false));
        assert_eq!(table.to_map().len(), 2);
    }
}
