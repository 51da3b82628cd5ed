//! Free-text search and simple list filters.
//!
//! Search is a case-insensitive substring match over selected fields, with OR
//! semantics across fields. No tokenization, no ranking.

use crate::categories::normalize_tag;
use crate::models::{Achievement, Project};

/// Extracts the searchable values of one field. List fields yield several values.
pub type FieldSelector<T> = fn(&T) -> Vec<&str>;

pub fn filter_by_query<'a, T>(items: &'a [T], query: &str, fields: &[FieldSelector<T>]) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| {
            fields
                .iter()
                .any(|select| select(item).iter().any(|value| value.to_lowercase().contains(&needle)))
        })
        .collect()
}

pub fn project_title(project: &Project) -> Vec<&str> {
    vec![project.title.as_str()]
}

pub fn project_tech_stack(project: &Project) -> Vec<&str> {
    project.tech_stack.iter().map(String::as_str).collect()
}

pub fn project_description(project: &Project) -> Vec<&str> {
    project.description.as_deref().into_iter().collect()
}

/// Fields searched from the archive page
pub const ARCHIVE_FIELDS: [FieldSelector<Project>; 2] = [project_title, project_tech_stack];

/// Achievements from one year; `None` or "All" keeps everything
pub fn filter_by_year<'a>(items: &'a [Achievement], year: Option<&str>) -> Vec<&'a Achievement> {
    match year.map(str::trim) {
        None => items.iter().collect(),
        Some(y) if y.is_empty() || y.eq_ignore_ascii_case("all") => items.iter().collect(),
        Some(y) => items.iter().filter(|a| a.year == y).collect(),
    }
}

/// Unique years, newest first
pub fn distinct_years(items: &[Achievement]) -> Vec<String> {
    let mut years: Vec<String> = items
        .iter()
        .map(|a| a.year.clone())
        .filter(|y| !y.is_empty())
        .collect();
    years.sort();
    years.dedup();
    years.reverse();
    years
}

/// Projects related to `current` by category.
///
/// Categories are compared lowercased with hyphens as spaces; a project is
/// related when either category contains the other. `current` itself is
/// excluded by slug.
pub fn related_by_category<'a>(all: &'a [Project], current: &Project) -> Vec<&'a Project> {
    let current_category = normalize_tag(current.category.as_deref().unwrap_or(""));

    all.iter()
        .filter(|p| p.slug != current.slug)
        .filter(|p| {
            let category = normalize_tag(p.category.as_deref().unwrap_or(""));
            category.contains(&current_category) || current_category.contains(&category)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(slug: &str, title: &str, category: Option<&str>, tech: &[&str]) -> Project {
        Project {
            slug: slug.to_string(),
            title: title.to_string(),
            category: category.map(|c| c.to_string()),
            tech_stack: tech.iter().map(|t| t.to_string()).collect(),
            ..Project::default()
        }
    }

    fn archive() -> Vec<Project> {
        vec![
            project("shop", "Shopfront", Some("web-dev"), &["React", "Node.js"]),
            project("churn", "Churn Model", Some("data-science"), &["Python", "pandas"]),
            project("blog", "Static Blog", Some("web dev"), &["Hugo"]),
        ]
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let items = archive();
        for q in ["", "   "] {
            let got: Vec<&str> = filter_by_query(&items, q, &ARCHIVE_FIELDS).iter().map(|p| p.slug.as_str()).collect();
            assert_eq!(got, vec!["shop", "churn", "blog"]);
        }
    }

    #[test]
    fn test_case_insensitive() {
        let items = archive();
        let upper = filter_by_query(&items, "REACT", &ARCHIVE_FIELDS);
        let lower = filter_by_query(&items, "react", &ARCHIVE_FIELDS);
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].slug, "shop");
        assert_eq!(lower.len(), 1);
    }

    #[test]
    fn test_any_field_matches() {
        let items = archive();
        // title hit
        assert_eq!(filter_by_query(&items, "blog", &ARCHIVE_FIELDS)[0].slug, "blog");
        // tech stack hit
        assert_eq!(filter_by_query(&items, " pandas ", &ARCHIVE_FIELDS)[0].slug, "churn");
        // only title selected: tech stack no longer searched
        assert!(filter_by_query(&items, "pandas", &[project_title]).is_empty());
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let items = archive();
        assert!(filter_by_query(&items, "shpfront", &ARCHIVE_FIELDS).is_empty());
    }

    #[test]
    fn test_related_by_category() {
        let items = archive();
        let current = &items[0];
        let related: Vec<&str> = related_by_category(&items, current).iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(related, vec!["blog"]);
    }

    #[test]
    fn test_year_filter_and_years() {
        let items = vec![
            Achievement { id: 1, year: "2022".into(), ..Achievement::default() },
            Achievement { id: 2, year: "2024".into(), ..Achievement::default() },
            Achievement { id: 3, year: "2022".into(), ..Achievement::default() },
        ];
        assert_eq!(distinct_years(&items), vec!["2024", "2022"]);
        assert_eq!(filter_by_year(&items, Some("2022")).len(), 2);
        assert_eq!(filter_by_year(&items, Some("All")).len(), 3);
        assert_eq!(filter_by_year(&items, None).len(), 3);
        assert!(filter_by_year(&items, Some("1999")).is_empty());
    }
}
