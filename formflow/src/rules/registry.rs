//! Ordered registry of field rule sets.

use std::collections::HashMap;

use super::rule_set::FieldRules;

/// Field name to rule set, iterated in registration order.
///
/// Registration order decides which failing field is reported (and focused)
/// first, so it is kept as an explicit sequence.
#[derive(Debug, Clone, Default)]
pub struct FieldRulesRegistry {
    order: Vec<String>,
    rules: HashMap<String, FieldRules>,
}

impl FieldRulesRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers rules for a field.
    ///
    /// Re-registering replaces the rule set but keeps the field's original
    /// position.
    pub fn register(&mut self, name: impl Into<String>, rules: FieldRules) {
        let name = name.into();
        if !self.rules.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.rules.insert(name, rules);
    }

    /// Gets the rules for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.rules.get(name)
    }

    /// Checks if a field has rules.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Iterates `(name, rules)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.order
            .iter()
            .filter_map(|name| self.rules.get(name).map(|rules| (name.as_str(), rules)))
    }

    /// Returns field names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Removes every registration.
    pub fn clear(&mut self) {
        self.order.clear();
        self.rules.clear();
    }

    /// Returns the number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no field is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
