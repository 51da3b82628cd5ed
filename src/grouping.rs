//! Grouping of tagged items into canonical category buckets.
//!
//! Buckets appear in the order their category is first encountered and keep
//! source order inside. Every item lands in exactly one bucket because the
//! classifier falls back to `Category::Default`.

use crate::categories::{Category, CategoryRules};
use serde::Serialize;

/// Anything carrying a free-text category tag
pub trait Tagged {
    fn category(&self) -> Option<&str>;
}

/// Items sharing one canonical category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBucket<'a, T> {
    pub category: Category,
    pub items: Vec<&'a T>,
}

/// Result of one classification pass
#[derive(Debug, Clone)]
pub struct CategoryGroups<'a, T> {
    buckets: Vec<CategoryBucket<'a, T>>,
}

impl<'a, T> CategoryGroups<'a, T> {
    pub fn buckets(&self) -> &[CategoryBucket<'a, T>] {
        &self.buckets
    }

    pub fn categories(&self) -> Vec<Category> {
        self.buckets.iter().map(|b| b.category).collect()
    }

    pub fn bucket(&self, category: Category) -> Option<&CategoryBucket<'a, T>> {
        self.buckets.iter().find(|b| b.category == category)
    }

    /// Items for the active category. Empty slice when it has none.
    pub fn active(&self, category: Category) -> &[&'a T] {
        self.bucket(category).map(|b| b.items.as_slice()).unwrap_or(&[])
    }

    /// The requested category if it has items, else the first bucket's
    pub fn resolve_active(&self, requested: Category) -> Option<Category> {
        if self.bucket(requested).is_some() {
            return Some(requested);
        }
        self.buckets.first().map(|b| b.category)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn into_buckets(self) -> Vec<CategoryBucket<'a, T>> {
        self.buckets
    }
}

pub fn group_by_category<'a, T: Tagged>(items: &'a [T], rules: &CategoryRules) -> CategoryGroups<'a, T> {
    let mut buckets: Vec<CategoryBucket<'a, T>> = Vec::new();

    for item in items {
        let category = rules.classify(item.category());
        match buckets.iter_mut().find(|b| b.category == category) {
            Some(bucket) => bucket.items.push(item),
            None => buckets.push(CategoryBucket { category, items: vec![item] }),
        }
    }

    CategoryGroups { buckets }
}

/// Gallery tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryTab {
    #[default]
    All,
    Only(Category),
}

impl CategoryTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTab::All => "all",
            CategoryTab::Only(category) => category.as_str(),
        }
    }

    /// Unknown tab ids fall back to `All`
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|s| s.trim().to_lowercase()) {
            None => CategoryTab::All,
            Some(s) if s.is_empty() || s == "all" => CategoryTab::All,
            Some(s) => Category::from_str(&s).map(CategoryTab::Only).unwrap_or(CategoryTab::All),
        }
    }

    /// Each tab tests the tag on its own, so one item may show under several tabs
    pub fn matches(&self, raw: Option<&str>, rules: &CategoryRules) -> bool {
        match self {
            CategoryTab::All => true,
            CategoryTab::Only(c) => rules.matches_category(raw, *c),
        }
    }
}

pub fn filter_by_tab<'a, T: Tagged>(items: &'a [T], tab: CategoryTab, rules: &CategoryRules) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| tab.matches(item.category(), rules))
        .collect()
}

/// Item counts per tab in the given tab order
pub fn tab_counts<T: Tagged>(items: &[T], tabs: &[CategoryTab], rules: &CategoryRules) -> Vec<(CategoryTab, usize)> {
    tabs.iter()
        .map(|tab| (*tab, items.iter().filter(|i| tab.matches(i.category(), rules)).count()))
        .collect()
}
