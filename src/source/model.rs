use crate::config;
use serde::{Deserialize, Serialize};

/// Grouping for the source list. Has no effect on searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Academic,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 2] = [Category::General, Category::Academic];

    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Academic => "Academic",
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// How a query is combined with a source's URL template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlTemplateMode {
    /// Always append the encoded query to the template
    #[default]
    Append,
    /// Replace every `%s` with the encoded query, appending if there is none
    Placeholder,
}

/// A destination search engine or database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSource {
    pub id: String,
    pub name: String,
    pub url_template: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_custom: bool,
}

impl SearchSource {
    /// Build the built-in sources from the static table
    pub fn builtins() -> Vec<Self> {
        config::BUILTIN_SOURCES
            .iter()
            .map(|(id, name, url_template, description, category)| Self {
                id: id.to_string(),
                name: name.to_string(),
                url_template: url_template.to_string(),
                description: description.to_string(),
                category: *category,
                is_custom: false,
            })
            .collect()
    }

    /// Destination URL for `query`
    pub fn url_for(&self, query: &str, mode: UrlTemplateMode) -> String {
        let encoded = urlencoding::encode(query);
        match mode {
            UrlTemplateMode::Placeholder if self.url_template.contains(config::QUERY_PLACEHOLDER) => {
                self.url_template.replace(config::QUERY_PLACEHOLDER, &encoded)
            }
            _ => format!("{}{}", self.url_template, encoded),
        }
    }
}

/// User input from the add-source form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDraft {
    /// Ignored: a fresh id is always assigned on insertion
    pub id: Option<String>,
    pub name: String,
    pub url_template: String,
    pub description: String,
    pub category: Category,
}

impl SourceDraft {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            ..Self::default()
        }
    }

    /// Name and URL template are both required
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.url_template.trim().is_empty()
    }

    pub(crate) fn into_source(self, id: String) -> SearchSource {
        SearchSource {
            id,
            name: self.name.trim().to_string(),
            url_template: self.url_template.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            is_custom: true,
        }
    }
}
