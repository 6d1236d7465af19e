use crate::formula::{FALSE, TRUE};
use indexmap::IndexMap;

/// Prefix of the temporaries introduced by lowering. No identifier can start
/// with it, so temporaries never collide with source variables.
pub const TEMP_PREFIX: char = '*';

pub fn is_temporary(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX)
}

/// Maps variable and temporary names to values.
///
/// The literals `1` and `0` are never stored: reading them yields `true` and
/// `false`, writing them does nothing. Names are kept in insertion order.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Environment {
    values: IndexMap<String, bool>,
}

impl Environment {
    /// Reads `name`; names that were never written read as `false`.
    pub fn get(&self, name: &str) -> bool {
        match name {
            TRUE => true,
            FALSE => false,
            _ => self.values.get(name).copied().unwrap_or(false),
        }
    }

    pub fn set(&mut self, name: &str, value: bool) {
        if name == TRUE || name == FALSE {
            return;
        }
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Entries that are source variables, skipping temporaries.
    pub fn free_variables(&self) -> impl Iterator<Item = (&str, bool)> {
        self.iter().filter(|(name, _)| !is_temporary(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
