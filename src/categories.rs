// =============================================================================
// Category Normalization
// =============================================================================
//
// Maps free-text category tags from the content store onto a closed set of
// canonical categories:
// - web-dev: web, frontend, backend, fullstack
// - machine-learning: machine, learning, ml, deep, neural, nlp
// - data-ai: data, ai, science, analytics, python
// - creative: creative, design, ui, ux, art
// - tools: tools, devops, cloud, server
// - default: everything else, including missing tags
//
// Classification uses keyword matching against an ordered rule table. The
// first matching rule wins, so narrower rules go first.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Canonical category identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WebDev,
    DataAi,
    MachineLearning,
    Creative,
    Tools,
    Default,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::WebDev,
        Category::MachineLearning,
        Category::DataAi,
        Category::Creative,
        Category::Tools,
        Category::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::WebDev => "web-dev",
            Category::DataAi => "data-ai",
            Category::MachineLearning => "machine-learning",
            Category::Creative => "creative",
            Category::Tools => "tools",
            Category::Default => "default",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "web-dev" => Some(Category::WebDev),
            // Project tabs call it data-science
            "data-ai" | "data-science" => Some(Category::DataAi),
            "machine-learning" => Some(Category::MachineLearning),
            "creative" => Some(Category::Creative),
            "tools" => Some(Category::Tools),
            "default" | "other" => Some(Category::Default),
            _ => None,
        }
    }

    /// Heading shown above a group
    pub fn label(&self) -> &'static str {
        match self {
            Category::WebDev => "Web Development",
            Category::DataAi => "Data Science",
            Category::MachineLearning => "Machine Learning",
            Category::Creative => "Creative Design",
            Category::Tools => "Tools & DevOps",
            Category::Default => "Other Skills",
        }
    }

    /// Compact chip text used on gallery cards
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::WebDev => "Web Dev",
            Category::DataAi => "Data Sci",
            Category::MachineLearning => "ML / AI",
            Category::Creative => "Design",
            Category::Tools => "Tools",
            Category::Default => "Project",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::WebDev => "Building robust, scalable applications with modern stacks.",
            Category::DataAi => "Deriving actionable insights from complex datasets.",
            Category::MachineLearning => "Building intelligent systems that learn and adapt from data.",
            Category::Creative => "Visual storytelling through interface and graphic design.",
            Category::Tools => "Streamlining workflow, version control, and deployment.",
            Category::Default => "Various technical skills and competencies.",
        }
    }
}

/// One entry of a rule table: any keyword hit assigns `category`
#[derive(Debug, Clone)]
pub struct CategoryRule {
    // None when the keyword list is empty; such a rule never matches
    pattern: Option<Regex>,
    category: Category,
}

impl CategoryRule {
    pub fn new(keywords: &[&str], category: Category) -> Result<Self, regex::Error> {
        let alternation = keywords
            .iter()
            .map(|k| normalize_tag(k))
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(&k))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = if alternation.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&format!("(?:{})", alternation))
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self { pattern, category })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    fn matches(&self, normalized: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|p| p.is_match(normalized))
            .unwrap_or(false)
    }
}

/// Ordered rule table. First match wins.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Build from `(keywords, category)` pairs, keeping their order
    pub fn from_table(table: &[(&[&str], Category)]) -> Result<Self, regex::Error> {
        let rules = table
            .iter()
            .map(|(keywords, category)| CategoryRule::new(keywords, *category))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    pub fn classify(&self, raw: Option<&str>) -> Category {
        classify_category(raw, self)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Whether any rule for `category` hits the tag, regardless of rule order.
    /// A tag mixing two areas ("data science & machine learning") matches both.
    /// `Default` has no rules of its own; it matches tags nothing else claims.
    pub fn matches_category(&self, raw: Option<&str>, category: Category) -> bool {
        if category == Category::Default {
            return self.classify(raw) == Category::Default;
        }
        let normalized = normalize_tag(raw.unwrap_or(""));
        if normalized.is_empty() {
            return false;
        }
        self.rules
            .iter()
            .filter(|rule| rule.category == category)
            .any(|rule| rule.matches(&normalized))
    }
}

static SKILL_RULES: LazyLock<CategoryRules> = LazyLock::new(|| {
    CategoryRules::from_table(&[
        (&["web", "frontend", "backend", "fullstack"], Category::WebDev),
        (&["machine", "learning", "ml", "deep", "neural", "nlp"], Category::MachineLearning),
        (&["data", "ai", "science", "analytics", "python"], Category::DataAi),
        (&["creative", "design", "ui", "ux", "art"], Category::Creative),
        (&["tools", "devops", "cloud", "server"], Category::Tools),
    ])
    .unwrap()
});

static PROJECT_RULES: LazyLock<CategoryRules> = LazyLock::new(|| {
    CategoryRules::from_table(&[
        (&["web", "development"], Category::WebDev),
        (&["machine", "learning", "ml"], Category::MachineLearning),
        (&["data", "science"], Category::DataAi),
    ])
    .unwrap()
});

/// Rules for the skills section of the about page
pub fn skill_rules() -> &'static CategoryRules {
    &SKILL_RULES
}

/// Rules for the project gallery tabs
pub fn project_rules() -> &'static CategoryRules {
    &PROJECT_RULES
}

/// Lowercase, trim, treat `-`/`_` as spaces and collapse whitespace runs
pub fn normalize_tag(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classify a raw category tag. Missing, empty or unmatched tags are `Default`.
pub fn classify_category(raw: Option<&str>, rules: &CategoryRules) -> Category {
    let normalized = match raw {
        Some(s) => normalize_tag(s),
        None => return Category::Default,
    };

    if normalized.is_empty() {
        return Category::Default;
    }

    rules
        .rules
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.category)
        .unwrap_or(Category::Default)
}

/// Compact chip text for a raw category key on a gallery card.
///
/// Gallery keys get short labels; anything else is shown with hyphens turned
/// into spaces.
pub fn format_category_chip(raw: Option<&str>) -> String {
    let key = match raw.map(str::trim) {
        Some(k) if !k.is_empty() => k,
        _ => return Category::Default.short_label().to_string(),
    };

    let slug = key.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    match slug.as_str() {
        "web-dev" => Category::WebDev.short_label().to_string(),
        "data-science" | "data-ai" => Category::DataAi.short_label().to_string(),
        "machine-learning" => Category::MachineLearning.short_label().to_string(),
        _ => key.replace('-', " "),
    }
}

/// Human label for a raw category key as stored on a project.
///
/// Known keys map to fixed labels; anything else is title-cased with hyphens
/// turned into spaces.
pub fn format_category_label(raw: Option<&str>) -> String {
    let key = match raw.map(str::trim) {
        Some(k) if !k.is_empty() => k,
        _ => return "Project".to_string(),
    };

    let slug = key.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    let known = match slug.as_str() {
        "web-dev" => Some("Web Development"),
        "data-science" | "data-ai" => Some("Data Science"),
        "machine-learning" => Some("Machine Learning"),
        "mobile-app" => Some("Mobile Application"),
        "ui-ux" => Some("UI/UX Design"),
        _ => None,
    };
    if let Some(label) = known {
        return label.to_string();
    }

    key.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_data_rules() -> CategoryRules {
        CategoryRules::from_table(&[
            (&["web"], Category::WebDev),
            (&["data"], Category::DataAi),
        ])
        .unwrap()
    }

    #[test]
    fn test_classify_scenario() {
        let rules = web_data_rules();
        let got: Vec<_> = [Some("Web Development"), Some("data-science"), None]
            .iter()
            .map(|raw| classify_category(*raw, &rules).as_str())
            .collect();
        assert_eq!(got, vec!["web-dev", "data-ai", "default"]);
    }

    #[test]
    fn test_classify_empty_and_blank() {
        let rules = skill_rules();
        assert_eq!(classify_category(Some(""), &rules), Category::Default);
        assert_eq!(classify_category(Some("   "), &rules), Category::Default);
        assert_eq!(classify_category(Some("gardening"), &rules), Category::Default);
    }

    #[test]
    fn test_hyphen_space_equivalence() {
        let rules = CategoryRules::from_table(&[(&["web dev"], Category::WebDev)]).unwrap();
        for raw in ["web dev", "web-dev", "Web_Dev", "  WEB   dev "] {
            assert_eq!(classify_category(Some(raw), &rules), Category::WebDev, "{}", raw);
        }

        let hyphenated = CategoryRules::from_table(&[(&["full-stack"], Category::WebDev)]).unwrap();
        assert_eq!(hyphenated.classify(Some("Full Stack")), Category::WebDev);
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = skill_rules();
        // "web" precedes "data" in the table
        assert_eq!(rules.classify(Some("web data")), Category::WebDev);
        // "learning" precedes "ai"
        assert_eq!(rules.classify(Some("Deep Learning AI")), Category::MachineLearning);
        assert_eq!(rules.classify(Some("Analytics")), Category::DataAi);
        assert_eq!(rules.classify(Some("UI/UX")), Category::Creative);
        assert_eq!(rules.classify(Some("DevOps")), Category::Tools);
    }

    #[test]
    fn test_result_always_in_closed_set() {
        let rules = skill_rules();
        for raw in ["", "x", "Frontend", "NLP", "?!", "data_ai", "🦀"] {
            let category = rules.classify(Some(raw));
            assert!(Category::ALL.contains(&category));
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_keywords_are_literal() {
        // Regex metacharacters in keywords do not act as patterns
        let rules = CategoryRules::from_table(&[(&["c++"], Category::Tools)]).unwrap();
        assert_eq!(rules.classify(Some("C++ tooling")), Category::Tools);
        assert_eq!(rules.classify(Some("ccc")), Category::Default);
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let rules = CategoryRules::from_table(&[(&[], Category::Tools), (&[""], Category::Creative)]).unwrap();
        assert_eq!(rules.classify(Some("anything")), Category::Default);
    }

    #[test]
    fn test_data_science_alias() {
        assert_eq!(Category::from_str("data-science"), Some(Category::DataAi));
        assert_eq!(Category::from_str("nope"), None);
    }

    #[test]
    fn test_format_category_label() {
        assert_eq!(format_category_label(Some("web-dev")), "Web Development");
        assert_eq!(format_category_label(Some("Machine Learning")), "Machine Learning");
        assert_eq!(format_category_label(Some("game-dev")), "Game Dev");
        assert_eq!(format_category_label(None), "Project");
        assert_eq!(format_category_label(Some("  ")), "Project");
    }

    #[test]
    fn test_format_category_chip() {
        assert_eq!(format_category_chip(Some("web-dev")), "Web Dev");
        assert_eq!(format_category_chip(Some("Data Science")), "Data Sci");
        assert_eq!(format_category_chip(Some("machine-learning")), "ML / AI");
        assert_eq!(format_category_chip(Some("mobile-app")), "mobile app");
        assert_eq!(format_category_chip(None), "Project");
    }

    #[test]
    fn test_matches_category_ignores_rule_order() {
        let rules = project_rules();
        let mixed = Some("Data Science & Machine Learning");
        assert_eq!(rules.classify(mixed), Category::MachineLearning);
        assert!(rules.matches_category(mixed, Category::MachineLearning));
        assert!(rules.matches_category(mixed, Category::DataAi));
        assert!(!rules.matches_category(mixed, Category::WebDev));
        assert!(!rules.matches_category(mixed, Category::Default));

        assert!(rules.matches_category(Some("cooking"), Category::Default));
        assert!(rules.matches_category(None, Category::Default));
        assert!(!rules.matches_category(None, Category::WebDev));
    }
}
