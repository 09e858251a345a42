//! Category registry
//!
//! Each sighting category is published under an innocuous bird code; the
//! descriptor keeps what the code really stands for next to the display
//! attributes used by the feed and the map.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display attributes of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    /// Public code stored on reports
    pub code: String,
    pub display_label: String,
    /// What the code stands for. Never shown by the app.
    #[serde(skip_serializing, default)]
    pub real_meaning: String,
    pub color_token: String,
    pub background_token: String,
    pub glyph: String,
    /// Hex color of the map marker
    pub pin_color: String,
}

impl CategoryDescriptor {
    fn builtin(
        code: &str,
        real_meaning: &str,
        color_token: &str,
        background_token: &str,
        glyph: &str,
        pin_color: &str,
    ) -> Self {
        Self {
            code: code.to_string(),
            display_label: code.to_string(),
            real_meaning: real_meaning.to_string(),
            color_token: color_token.to_string(),
            background_token: background_token.to_string(),
            glyph: glyph.to_string(),
            pin_color: pin_color.to_string(),
        }
    }
}

/// Outcome of looking up a report's category code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryResolution<'a> {
    Found(&'a CategoryDescriptor),
    /// Unknown code; the caller picks the fallback
    UseDefault,
}

/// Ordered, non-empty list of categories with unique codes
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    entries: Vec<CategoryDescriptor>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    pub fn new(entries: Vec<CategoryDescriptor>) -> Result<Self> {
        if entries.is_empty() {
            return Err(AppError::Registry("at least one category is required".to_string()));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.code.clone(), position).is_some() {
                return Err(AppError::Registry(format!("duplicate code: {}", entry.code)));
            }
        }

        Ok(Self { entries, index })
    }

    /// The four categories the app ships with
    pub fn builtin() -> Self {
        let entries = vec![
            CategoryDescriptor::builtin(
                "Blue Jay",
                "Local Police / ICE",
                "text-blue-600",
                "bg-blue-100",
                "🚙",
                "#2563eb",
            ),
            CategoryDescriptor::builtin(
                "Red Hawk",
                "Military / Fed Agents",
                "text-red-600",
                "bg-red-100",
                "🦅",
                "#dc2626",
            ),
            CategoryDescriptor::builtin(
                "Nest",
                "Checkpoint / Roadblock",
                "text-orange-600",
                "bg-orange-100",
                "🚧",
                "#ea580c",
            ),
            CategoryDescriptor::builtin(
                "Flock",
                "Large Convoy",
                "text-purple-600",
                "bg-purple-100",
                "🚚",
                "#9333ea",
            ),
        ];

        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.code.clone(), position))
            .collect();

        Self { entries, index }
    }

    pub fn find(&self, code: &str) -> Option<&CategoryDescriptor> {
        self.index.get(code).map(|&position| &self.entries[position])
    }

    pub fn resolve(&self, code: &str) -> CategoryResolution<'_> {
        match self.find(code) {
            Some(descriptor) => CategoryResolution::Found(descriptor),
            None => CategoryResolution::UseDefault,
        }
    }

    /// First entry, used for unknown codes
    pub fn default_entry(&self) -> &CategoryDescriptor {
        &self.entries[0]
    }

    /// Resolve a code, substituting the first entry for unknown codes
    pub fn resolve_or_default(&self, code: &str) -> &CategoryDescriptor {
        match self.resolve(code) {
            CategoryResolution::Found(descriptor) => descriptor,
            CategoryResolution::UseDefault => self.default_entry(),
        }
    }

    pub fn entries(&self) -> &[CategoryDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(code: &str) -> CategoryDescriptor {
        CategoryDescriptor {
            code: code.to_string(),
            display_label: code.to_string(),
            real_meaning: String::new(),
            color_token: "text-gray-600".to_string(),
            background_token: "bg-gray-100".to_string(),
            glyph: "?".to_string(),
            pin_color: "#000000".to_string(),
        }
    }

    #[test]
    fn test_builtin_order_and_lookup() {
        let registry = CategoryRegistry::builtin();

        let codes: Vec<&str> = registry.entries().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["Blue Jay", "Red Hawk", "Nest", "Flock"]);

        let nest = registry.find("Nest").unwrap();
        assert_eq!(nest.pin_color, "#ea580c");
        assert_eq!(nest.real_meaning, "Checkpoint / Roadblock");
        assert!(registry.find("nest").is_none());
    }

    #[test]
    fn test_unknown_code_resolves_to_first_entry() {
        let registry = CategoryRegistry::builtin();

        assert_eq!(registry.resolve("Pigeon"), CategoryResolution::UseDefault);
        assert_eq!(registry.resolve_or_default("Pigeon").code, "Blue Jay");
        assert_eq!(registry.resolve_or_default("").code, "Blue Jay");
        assert_eq!(registry.resolve_or_default("Flock").code, "Flock");
    }

    #[test]
    fn test_custom_registry_default_is_first() {
        let registry = CategoryRegistry::new(vec![custom("Owl"), custom("Wren")]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve_or_default("Blue Jay").code, "Owl");
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            CategoryRegistry::new(vec![]),
            Err(AppError::Registry(_))
        ));
        assert!(matches!(
            CategoryRegistry::new(vec![custom("Owl"), custom("Owl")]),
            Err(AppError::Registry(_))
        ));
    }
}
