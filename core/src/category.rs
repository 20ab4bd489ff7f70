//! Category labels and category sets.
//!
//! Categories are coarse compatibility labels. A rule lists the categories
//! its elements carry and, for containers, the categories its children may
//! carry; a child fits when the two sets share at least one label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaError;

/// One label of the closed category vocabulary.
///
/// # Examples
///
/// ```
/// use lilyflower_core::Category;
///
/// let category: Category = "chordmode".parse().unwrap();
/// assert_eq!(category, Category::ChordMode);
/// assert!("orchestra".parse::<Category>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Markup,
    Attachment,
    Music,
    Comment,
    Lyrics,
    ChordMode,
    Setting,
    Field,
    Variable,
    Accent,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::Markup,
        Category::Attachment,
        Category::Music,
        Category::Comment,
        Category::Lyrics,
        Category::ChordMode,
        Category::Setting,
        Category::Field,
        Category::Variable,
        Category::Accent,
    ];

    /// Returns the label used in catalogs and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Markup => "markup",
            Category::Attachment => "attachment",
            Category::Music => "music",
            Category::Comment => "comment",
            Category::Lyrics => "lyrics",
            Category::ChordMode => "chordmode",
            Category::Setting => "setting",
            Category::Field => "field",
            Category::Variable => "variable",
            Category::Accent => "accent",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownCategory(s.to_string()))
    }
}

/// A set of [`Category`] labels.
///
/// # Examples
///
/// ```
/// use lilyflower_core::{Category, CategorySet};
///
/// let markup = CategorySet::from_slice(&[Category::Markup, Category::Attachment]);
/// let content = CategorySet::from_slice(&[Category::Markup, Category::Comment]);
/// assert!(markup.intersects(content));
/// assert!(!markup.intersects(CategorySet::from_slice(&[Category::Music])));
/// assert_eq!(markup.to_string(), "markup, attachment");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategorySet(u16);

impl CategorySet {
    /// The empty set.
    pub const EMPTY: CategorySet = CategorySet(0);

    /// Builds a set from a slice of labels.
    pub fn from_slice(categories: &[Category]) -> Self {
        categories.iter().copied().collect()
    }

    /// Builds a set holding one label.
    pub fn single(category: Category) -> Self {
        CategorySet(category.bit())
    }

    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    pub fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    /// Returns `true` if both sets share at least one label.
    pub fn intersects(self, other: CategorySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the labels in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = CategorySet::EMPTY;
        for category in iter {
            set.insert(category);
        }
        set
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let labels: Vec<&str> = self.iter().map(Category::as_str).collect();
        f.write_str(&labels.join(", "))
    }
}

impl fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for CategorySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let categories = Vec::<Category>::deserialize(deserializer)?;
        Ok(categories.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_label() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        assert_eq!(
            "music_expression".parse::<Category>(),
            Err(SchemaError::UnknownCategory("music_expression".into()))
        );
    }

    #[test]
    fn test_empty_set_intersects_nothing() {
        let all: CategorySet = Category::ALL.into_iter().collect();
        assert_eq!(all.len(), Category::ALL.len());
        assert!(!CategorySet::EMPTY.intersects(all));
        assert_eq!(CategorySet::EMPTY.to_string(), "nothing");
    }

    #[test]
    fn test_serde_as_label_list() {
        let set = CategorySet::from_slice(&[Category::Music, Category::Markup]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["markup","music"]"#);
        let back: CategorySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
