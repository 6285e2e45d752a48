use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of entries kept in the history and favourites lists.
pub const CITY_LIST_CAPACITY: usize = 8;

/// Ordered list of city names, oldest first, with a fixed capacity.
///
/// Names are compared exactly: "helsinki" and "Helsinki" are different
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CityList {
    #[serde(skip)]
    capacity: usize,
    names: Vec<String>,
}

impl Default for CityList {
    fn default() -> Self {
        Self::with_capacity(CITY_LIST_CAPACITY)
    }
}

impl CityList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Move `name` to the most-recent position, evicting the oldest entry
    /// when a new name would overflow the list.
    pub fn add_or_promote(&mut self, name: &str) {
        self.remove(name);

        if self.names.len() >= self.capacity {
            self.names.remove(0);
        }

        self.names.push(name.to_string());
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => {
                self.names.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn latest(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for CityList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = CityList::new();
        for name in iter {
            list.add_or_promote(name.as_ref());
        }
        list
    }
}

// Stored lists are replayed, so oversized or duplicated input comes back valid.
impl<'de> Deserialize<'de> for CityList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(names.into_iter().collect())
    }
}
