//! Monitor - Display Inventory Types

use ahash::AHashMap;

/// Monitor name -> adapter (GPU) name, as reported by the last scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorsMap(AHashMap<String, String>);

impl MonitorsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, monitor: impl Into<String>, adapter: impl Into<String>) {
        self.0.insert(monitor.into(), adapter.into());
    }

    pub fn contains(&self, monitor: &str) -> bool {
        self.0.contains_key(monitor)
    }

    /// Adapter driving the given monitor
    pub fn adapter(&self, monitor: &str) -> Option<&str> {
        self.0.get(monitor).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Monitor names in a stable display order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<K, V> FromIterator<(K, V)> for MonitorsMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
