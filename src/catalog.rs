//! Page data loaders.
//!
//! Each loader fetches what its page needs, then classifies, filters and
//! paginates in memory. Fetch failures are logged and the page renders with
//! empty collections; only a missing project is reported to the caller.

use crate::categories::{format_category_chip, format_category_label, project_rules, skill_rules, Category};
use crate::error::{CatalogError, StoreResult};
use crate::grouping::{filter_by_tab, group_by_category, tab_counts, CategoryTab};
use crate::models::{Achievement, Education, ExperienceItem, Project};
use crate::pagination::{paginate, total_pages, Page};
use crate::search::{distinct_years, filter_by_query, filter_by_year, related_by_category, ARCHIVE_FIELDS};
use crate::settings::PageSizes;
use crate::store::{ContentStore, Order};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Tech stack entries shown on a card before the "+N" chip
const CARD_TECH_PREVIEW: usize = 3;

/// Skill group shown when none is requested
const DEFAULT_SKILL_GROUP: Category = Category::WebDev;

/// Tabs of the project gallery, in display order
pub const PROJECT_TABS: [CategoryTab; 4] = [
    CategoryTab::All,
    CategoryTab::Only(Category::WebDev),
    CategoryTab::Only(Category::DataAi),
    CategoryTab::Only(Category::MachineLearning),
];

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> From<&Page<'_, T>> for PageInfo {
    fn from(page: &Page<'_, T>) -> Self {
        Self {
            index: page.index,
            page_size: page.page_size,
            total_pages: page.total_pages,
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        }
    }
}

/// Gallery/archive card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: Category,
    /// Full label, as on the featured project
    pub category_label: String,
    /// Short chip text for gallery cards
    pub category_chip: String,
    pub year: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub tech_preview: Vec<String>,
    pub tech_overflow: usize,
    pub is_featured: bool,
}

impl ProjectCard {
    pub fn from_project(project: &Project) -> Self {
        let tech_preview: Vec<String> = project.tech_stack.iter().take(CARD_TECH_PREVIEW).cloned().collect();
        Self {
            id: project.id,
            title: project.title.clone(),
            slug: project.slug.clone(),
            category: project_rules().classify(project.category.as_deref()),
            category_label: format_category_label(project.category.as_deref()),
            category_chip: format_category_chip(project.category.as_deref()),
            year: project.year.clone(),
            description: project.description.clone(),
            thumbnail: project.thumbnail.clone(),
            tech_overflow: project.tech_stack.len() - tech_preview.len(),
            tech_preview,
            is_featured: project.is_featured,
        }
    }
}

fn tab_label(tab: CategoryTab) -> &'static str {
    match tab {
        CategoryTab::All => "All",
        CategoryTab::Only(Category::WebDev) => "Web Dev",
        CategoryTab::Only(category) => category.label(),
    }
}

fn cards(projects: &[&Project]) -> Vec<ProjectCard> {
    projects.iter().map(|p| ProjectCard::from_project(p)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub featured: Option<ProjectCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    pub id: &'static str,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectsView {
    pub featured: Option<ProjectCard>,
    pub tabs: Vec<TabView>,
    pub active_tab: &'static str,
    pub projects: Vec<ProjectCard>,
    pub page: PageInfo,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveView {
    pub query: String,
    pub total_matches: usize,
    pub projects: Vec<ProjectCard>,
    pub page: PageInfo,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetailView {
    pub project: Project,
    pub category_label: String,
    pub related: Vec<ProjectCard>,
    pub related_page: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGroupView {
    pub category: Category,
    pub label: &'static str,
    pub description: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillView {
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutView {
    pub skill_groups: Vec<SkillGroupView>,
    pub active_skill_group: Option<Category>,
    pub skills: Vec<SkillView>,
    pub skill_page: PageInfo,
    pub experiences: Vec<ExperienceItem>,
    pub educations: Vec<Education>,
    /// "All" followed by distinct years, newest first
    pub years: Vec<String>,
    pub active_year: String,
    pub achievements: Vec<Achievement>,
    pub achievement_page: PageInfo,
    pub autoslide_interval_ms: u64,
}

/// About page query parameters
#[derive(Debug, Clone, Default)]
pub struct AboutQuery<'a> {
    pub skill_group: Option<&'a str>,
    pub skill_page: usize,
    pub year: Option<&'a str>,
    pub achievement_page: usize,
}

// ============================================================================
// Loaders
// ============================================================================

pub struct Catalog {
    store: Arc<dyn ContentStore>,
    page_sizes: PageSizes,
    autoslide_interval_ms: u64,
}

fn page_size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}

/// Degrade a failed fetch to an empty collection
fn or_empty<T>(what: &str, result: StoreResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("[Catalog] Failed to load {}: {}", what, e);
        Vec::new()
    })
}

impl Catalog {
    pub fn new(store: Arc<dyn ContentStore>, page_sizes: PageSizes, autoslide_interval_ms: u64) -> Self {
        Self { store, page_sizes, autoslide_interval_ms }
    }

    pub fn page_sizes(&self) -> &PageSizes {
        &self.page_sizes
    }

    /// Highlighted project: featured first, then newest
    pub async fn home(&self) -> HomeView {
        let projects = or_empty(
            "projects",
            self.store
                .list_projects(&[Order::desc("is_featured"), Order::desc("id")], Some(1))
                .await,
        );

        HomeView { featured: projects.first().map(ProjectCard::from_project) }
    }

    pub async fn projects(&self, tab: CategoryTab, page: usize) -> ProjectsView {
        let projects = or_empty("projects", self.store.list_projects(&[Order::desc("id")], None).await);
        let rules = project_rules();

        let featured = projects
            .iter()
            .find(|p| p.is_featured)
            .or_else(|| projects.first())
            .map(ProjectCard::from_project);

        let tabs = tab_counts(&projects, &PROJECT_TABS, rules)
            .into_iter()
            .map(|(tab, count)| TabView {
                id: tab.as_str(),
                label: tab_label(tab),
                count,
            })
            .collect();

        let filtered = filter_by_tab(&projects, tab, rules);
        let window = paginate(&filtered, page_size(self.page_sizes.gallery), page);

        ProjectsView {
            featured,
            tabs,
            active_tab: tab.as_str(),
            projects: cards(window.items),
            page: PageInfo::from(&window),
            empty: filtered.is_empty(),
        }
    }

    pub async fn archive(&self, query: &str, page: usize) -> ArchiveView {
        let projects = or_empty("projects", self.store.list_projects(&[Order::desc("year")], None).await);

        let matches = filter_by_query(&projects, query, &ARCHIVE_FIELDS);
        let window = paginate(&matches, page_size(self.page_sizes.archive), page);

        ArchiveView {
            query: query.trim().to_string(),
            total_matches: matches.len(),
            projects: cards(window.items),
            page: PageInfo::from(&window),
            empty: matches.is_empty(),
        }
    }

    pub async fn project_detail(&self, slug: &str, related_page: usize) -> Result<ProjectDetailView, CatalogError> {
        let project = match self.store.get_project_by_slug(slug).await {
            Ok(Some(project)) => project,
            Ok(None) => return Err(CatalogError::NotFound(slug.to_string())),
            Err(e) => {
                tracing::warn!("[Catalog] Failed to load project '{}': {}", slug, e);
                return Err(CatalogError::NotFound(slug.to_string()));
            }
        };

        let all = or_empty("projects", self.store.list_projects(&[], None).await);
        let related = related_by_category(&all, &project);
        let window = paginate(&related, page_size(self.page_sizes.recommendations), related_page);

        Ok(ProjectDetailView {
            category_label: format_category_label(project.category.as_deref()),
            related: cards(window.items),
            related_page: PageInfo::from(&window),
            project,
        })
    }

    pub async fn about(&self, query: AboutQuery<'_>) -> AboutView {
        let by_start = [Order::desc("start_date")];
        let by_year = [Order::desc("year")];
        let (skills, experiences, educations, achievements) = tokio::join!(
            self.store.list_skills(),
            self.store.list_experiences(&by_start),
            self.store.list_educations(&by_year),
            self.store.list_achievements(&by_year),
        );
        let skills = or_empty("skills", skills);
        let experiences = or_empty("experiences", experiences);
        let educations = or_empty("educations", educations);
        let achievements = or_empty("achievements", achievements);

        // Skills: grouped, opens on web-dev, falls back to the first group present
        let groups = group_by_category(&skills, skill_rules());
        let requested = query
            .skill_group
            .and_then(Category::from_str)
            .unwrap_or(DEFAULT_SKILL_GROUP);
        let active = groups.resolve_active(requested);
        let active_skills = active.map(|c| groups.active(c)).unwrap_or(&[]);
        let skill_window = paginate(active_skills, page_size(self.page_sizes.skills), query.skill_page);

        let skill_groups = groups
            .buckets()
            .iter()
            .map(|b| SkillGroupView {
                category: b.category,
                label: b.category.label(),
                description: b.category.description(),
                count: b.items.len(),
            })
            .collect();

        // Achievements: year filter, carousel page wraps around
        let mut years = vec!["All".to_string()];
        years.extend(distinct_years(&achievements));
        let active_year = match query.year.map(str::trim) {
            Some(y) if years.iter().any(|known| known == y) => y.to_string(),
            _ => "All".to_string(),
        };
        let filtered = filter_by_year(&achievements, Some(&active_year));
        let achievement_size = page_size(self.page_sizes.achievements);
        let total = total_pages(filtered.len(), achievement_size);
        let achievement_index = if total == 0 { 0 } else { query.achievement_page % total };
        let achievement_window = paginate(&filtered, achievement_size, achievement_index);

        AboutView {
            skill_groups,
            active_skill_group: active,
            skills: skill_window
                .items
                .iter()
                .map(|s| SkillView { name: s.name.clone(), icon_url: s.resolved_icon_url() })
                .collect(),
            skill_page: PageInfo::from(&skill_window),
            experiences: experiences.into_iter().map(ExperienceItem::from).collect(),
            educations,
            years,
            active_year,
            achievements: achievement_window.items.iter().map(|a| (*a).clone()).collect(),
            achievement_page: PageInfo::from(&achievement_window),
            autoslide_interval_ms: self.autoslide_interval_ms,
        }
    }
}
