//! Content store access.
//!
//! The hosted table store speaks PostgREST: one REST resource per table,
//! filtering, ordering and limits in the query string.
//!
//! API Documentation: https://postgrest.org/en/stable/references/api/tables_views.html

use crate::error::{StoreError, StoreResult};
use crate::models::{Achievement, Education, ExperienceRow, Project, Skill};
use crate::settings::Settings;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const PROJECTS: &str = "projects";
pub const SKILLS: &str = "skills";
pub const EXPERIENCES: &str = "experiences";
pub const EDUCATIONS: &str = "educations";
pub const ACHIEVEMENTS: &str = "achievements";

/// Sort key for a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &str) -> Self {
        Self { column: column.to_string(), ascending: true }
    }

    pub fn desc(column: &str) -> Self {
        Self { column: column.to_string(), ascending: false }
    }

    fn to_param(&self) -> String {
        format!("{}.{}", self.column, if self.ascending { "asc" } else { "desc" })
    }
}

/// Read access to the portfolio tables
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_projects(&self, order: &[Order], limit: Option<usize>) -> StoreResult<Vec<Project>>;

    async fn get_project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>>;

    async fn list_skills(&self) -> StoreResult<Vec<Skill>>;

    async fn list_experiences(&self, order: &[Order]) -> StoreResult<Vec<ExperienceRow>>;

    async fn list_educations(&self, order: &[Order]) -> StoreResult<Vec<Education>>;

    async fn list_achievements(&self, order: &[Order]) -> StoreResult<Vec<Achievement>>;
}

/// Query against one table
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub order: Vec<Order>,
    pub limit: Option<usize>,
    pub eq: Vec<(String, String)>,
}

impl TableQuery {
    pub fn ordered(order: &[Order]) -> Self {
        Self { order: order.to_vec(), ..Self::default() }
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.eq.push((column.to_string(), value.to_string()));
        self
    }
}

// ============================================================================
// PostgREST client
// ============================================================================

pub struct SupabaseStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| StoreError::Config(format!("invalid URL '{}': {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!("unsupported scheme '{}'", base_url.scheme())));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url, api_key: api_key.to_string() })
    }

    pub fn from_settings(settings: &Settings) -> StoreResult<Self> {
        let url = settings
            .supabase_url
            .as_deref()
            .ok_or_else(|| StoreError::Config("supabase_url is not set".to_string()))?;
        let key = settings
            .supabase_key
            .as_deref()
            .ok_or_else(|| StoreError::Config("supabase_key is not set".to_string()))?;
        Self::new(url, key, settings.request_timeout())
    }

    /// Full request URL for a table query
    pub fn table_url(&self, table: &str, query: &TableQuery) -> StoreResult<Url> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| StoreError::Config(format!("invalid table '{}': {}", table, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for (column, value) in &query.eq {
                pairs.append_pair(column, &format!("eq.{}", value));
            }
            if !query.order.is_empty() {
                let order = query.order.iter().map(Order::to_param).collect::<Vec<_>>().join(",");
                pairs.append_pair("order", &order);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        Ok(url)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, table: &str, query: &TableQuery) -> StoreResult<Vec<T>> {
        let url = self.table_url(table, query)?;
        tracing::debug!("[Store] GET {}", url);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let body = response.text().await?;
        let rows: Vec<T> = serde_json::from_str(&body)?;
        tracing::debug!("[Store] {} rows from {}", rows.len(), table);
        Ok(rows)
    }
}

#[async_trait]
impl ContentStore for SupabaseStore {
    async fn list_projects(&self, order: &[Order], limit: Option<usize>) -> StoreResult<Vec<Project>> {
        self.fetch_rows(PROJECTS, &TableQuery::ordered(order).limit(limit)).await
    }

    async fn get_project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        let query = TableQuery::default().eq("slug", slug).limit(Some(1));
        let rows: Vec<Project> = self.fetch_rows(PROJECTS, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_skills(&self) -> StoreResult<Vec<Skill>> {
        self.fetch_rows(SKILLS, &TableQuery::default()).await
    }

    async fn list_experiences(&self, order: &[Order]) -> StoreResult<Vec<ExperienceRow>> {
        self.fetch_rows(EXPERIENCES, &TableQuery::ordered(order)).await
    }

    async fn list_educations(&self, order: &[Order]) -> StoreResult<Vec<Education>> {
        self.fetch_rows(EDUCATIONS, &TableQuery::ordered(order)).await
    }

    async fn list_achievements(&self, order: &[Order]) -> StoreResult<Vec<Achievement>> {
        self.fetch_rows(ACHIEVEMENTS, &TableQuery::ordered(order)).await
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Fixed rows served from memory. Ordering follows the same column names as
/// the remote tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub experiences: Vec<ExperienceRow>,
    pub educations: Vec<Education>,
    pub achievements: Vec<Achievement>,
}

impl MemoryStore {
    /// Load a table dump: a JSON object keyed by table name
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let store: MemoryStore = serde_json::from_str(&content)?;
        tracing::info!(
            "[Store] Loaded {} projects, {} skills, {} experiences, {} educations, {} achievements from {}",
            store.projects.len(),
            store.skills.len(),
            store.experiences.len(),
            store.educations.len(),
            store.achievements.len(),
            path.display()
        );
        Ok(store)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_projects(&self, order: &[Order], limit: Option<usize>) -> StoreResult<Vec<Project>> {
        let mut rows = sort_rows(&self.projects, order);
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn get_project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        Ok(self.projects.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_skills(&self) -> StoreResult<Vec<Skill>> {
        Ok(self.skills.clone())
    }

    async fn list_experiences(&self, order: &[Order]) -> StoreResult<Vec<ExperienceRow>> {
        Ok(sort_rows(&self.experiences, order))
    }

    async fn list_educations(&self, order: &[Order]) -> StoreResult<Vec<Education>> {
        Ok(sort_rows(&self.educations, order))
    }

    async fn list_achievements(&self, order: &[Order]) -> StoreResult<Vec<Achievement>> {
        Ok(sort_rows(&self.achievements, order))
    }
}

/// Stable sort by the serialized column values. Nulls sort last, as PostgREST does for ascending order.
fn sort_rows<T: Serialize + Clone>(rows: &[T], order: &[Order]) -> Vec<T> {
    let mut keyed: Vec<(Value, &T)> = rows
        .iter()
        .map(|row| (serde_json::to_value(row).unwrap_or(Value::Null), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        for o in order {
            let ord = compare_values(&a[&o.column], &b[&o.column]);
            let ord = if o.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    keyed.into_iter().map(|(_, row)| row.clone()).collect()
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new("https://abc.supabase.co", "anon", Duration::from_secs(5)).unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    #[test]
    fn test_table_url_with_order_and_limit() {
        let query = TableQuery::ordered(&[Order::desc("is_featured"), Order::desc("id")]).limit(Some(1));
        let url = store().table_url(PROJECTS, &query).unwrap();
        assert_eq!(url.path(), "/rest/v1/projects");
        assert_eq!(
            pairs(&url),
            vec![
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "is_featured.desc,id.desc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_table_url_with_eq_filter() {
        let query = TableQuery::default().eq("slug", "my project");
        let url = store().table_url(PROJECTS, &query).unwrap();
        assert!(pairs(&url).contains(&("slug".to_string(), "eq.my project".to_string())));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let store = SupabaseStore::new("http://localhost:54321/proxy", "k", Duration::from_secs(1)).unwrap();
        let url = store.table_url(SKILLS, &TableQuery::default()).unwrap();
        assert_eq!(url.path(), "/proxy/rest/v1/skills");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SupabaseStore::new("not a url", "k", Duration::from_secs(1)),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            SupabaseStore::new("ftp://abc.example.com", "k", Duration::from_secs(1)),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_from_settings_requires_url_and_key() {
        let settings = Settings::default();
        assert!(matches!(SupabaseStore::from_settings(&settings), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_memory_store_load_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(
            &path,
            r#"{"projects":[{"id":1,"title":"Shop","slug":"shop","year":2023,"tech_stack":"[\"Rust\"]"}],
                "skills":[{"id":1,"name":"Rust","category":"backend"}]}"#,
        )
        .unwrap();

        let store = MemoryStore::load(&path).unwrap();
        assert_eq!(store.projects[0].year, "2023");
        assert_eq!(store.projects[0].tech_stack, vec!["Rust"]);
        assert_eq!(store.skills.len(), 1);
        assert!(store.achievements.is_empty());

        assert!(matches!(MemoryStore::load(&dir.path().join("missing.json")), Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_memory_store_ordering_and_limit() {
        let store = MemoryStore {
            projects: vec![
                Project { id: 1, slug: "a".into(), year: "2022".into(), ..Project::default() },
                Project { id: 2, slug: "b".into(), year: "2024".into(), is_featured: true, ..Project::default() },
                Project { id: 3, slug: "c".into(), year: "2023".into(), ..Project::default() },
            ],
            ..MemoryStore::default()
        };

        let by_year = store.list_projects(&[Order::desc("year")], None).await.unwrap();
        let slugs: Vec<&str> = by_year.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "c", "a"]);

        let by_id = store.list_projects(&[Order::desc("id")], Some(2)).await.unwrap();
        let slugs: Vec<&str> = by_id.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "b"]);

        let featured = store
            .list_projects(&[Order::desc("is_featured"), Order::desc("id")], Some(1))
            .await
            .unwrap();
        assert_eq!(featured[0].slug, "b");

        assert_eq!(store.get_project_by_slug("c").await.unwrap().map(|p| p.id), Some(3));
        assert!(store.get_project_by_slug("zzz").await.unwrap().is_none());
    }
}
