// SPDX-License-Identifier: MIT OR Apache-2.0
//! Exposed properties: the named strings (speakers) nodes refer to.

use crate::error::{DialogueError, Result};
use serde::{Deserialize, Serialize};

/// Base name for a property added without one
pub const DEFAULT_PROPERTY_NAME: &str = "New Property";

/// Appended to a colliding name until it is unique
const DISAMBIGUATION_SUFFIX: &str = "(a)";

/// A named string slot, e.g. a speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedProperty {
    /// Unique property name
    pub property_name: String,
}

impl ExposedProperty {
    /// Create a property
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
        }
    }
}

/// Ordered table of uniquely named properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposedPropertyTable {
    properties: Vec<ExposedProperty>,
}

impl ExposedPropertyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property.
    ///
    /// A colliding name gets `"(a)"` appended until it is unique, so adding
    /// `"X"` twice stores `"X"` and `"X(a)"`.
    pub fn add(&mut self, name: &str) -> &ExposedProperty {
        let mut unique = name.to_string();
        while self.contains(&unique) {
            unique.push_str(DISAMBIGUATION_SUFFIX);
        }

        let index = self.properties.len();
        self.properties.push(ExposedProperty::new(unique));
        &self.properties[index]
    }

    /// Insert a property named [`DEFAULT_PROPERTY_NAME`]
    pub fn add_default(&mut self) -> &ExposedProperty {
        self.add(DEFAULT_PROPERTY_NAME)
    }

    /// Rename a property in place
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let index = self
            .position_of(old_name)
            .ok_or_else(|| DialogueError::PropertyNotFound(old_name.to_string()))?;

        if old_name == new_name {
            return Ok(());
        }
        if self.contains(new_name) {
            return Err(DialogueError::DuplicateName(new_name.to_string()));
        }

        self.properties[index].property_name = new_name.to_string();
        Ok(())
    }

    /// Remove a property. Nodes naming it keep the stale string.
    pub fn remove(&mut self, name: &str) -> Option<ExposedProperty> {
        let index = self.position_of(name)?;
        Some(self.properties.remove(index))
    }

    /// Remove every property
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Whether a property has this name
    pub fn contains(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.property_name == name)
    }

    /// Index of a property, e.g. to preselect it in a choice list
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.property_name == name)
    }

    /// Property names in table order
    pub fn names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.property_name.clone()).collect()
    }

    /// Iterate over properties in table order
    pub fn iter(&self) -> impl Iterator<Item = &ExposedProperty> {
        self.properties.iter()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
