//! Resource models representing catalog records and their detail views.

use serde::{Deserialize, Serialize};

/// Kind of scholarly resource held in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Article,
    Book,
    Thesis,
}

impl ResourceType {
    /// Returns the identifier used in URLs, filters and exports
    pub fn id(&self) -> &'static str {
        match self {
            ResourceType::Article => "article",
            ResourceType::Book => "book",
            ResourceType::Thesis => "thesis",
        }
    }

    /// Returns the human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Article => "Journal Article",
            ResourceType::Book => "Book",
            ResourceType::Thesis => "Thesis",
        }
    }

    /// Returns the RIS `TY` code for this type
    pub fn ris_code(&self) -> &'static str {
        match self {
            ResourceType::Article => "JOUR",
            ResourceType::Book => "BOOK",
            ResourceType::Thesis => "THES",
        }
    }

    /// Parse a type identifier, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "article" => Some(ResourceType::Article),
            "book" => Some(ResourceType::Book),
            "thesis" => Some(ResourceType::Thesis),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A scholarly resource as returned by a catalog search
///
/// Snapshots are immutable once fetched; derived views (filtered, sorted,
/// paginated) clone or borrow them without modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Catalog identifier
    pub id: String,

    /// Resource title
    pub title: String,

    /// Author names, in citation order
    pub authors: Vec<String>,

    /// Publication year
    pub year: i32,

    /// Resource kind
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Journal name (articles)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    /// Publisher name (books)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Short description shown in result lists
    pub description: String,

    /// Digital Object Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Landing page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Thumbnail image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Free-form subject tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Number of downloads
    pub download_count: u32,

    /// Number of citations
    pub citation_count: u32,

    /// Number of page views, when tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u32>,
}

impl Resource {
    /// Create a new resource with required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: i32,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            year,
            resource_type,
            journal: None,
            publisher: None,
            description: String::new(),
            doi: None,
            url: None,
            thumbnail_url: None,
            tags: Vec::new(),
            download_count: 0,
            citation_count: 0,
            view_count: None,
        }
    }

    /// Returns the venue: journal for articles, publisher otherwise
    pub fn venue(&self) -> Option<&str> {
        self.journal.as_deref().or(self.publisher.as_deref())
    }

    /// Composite popularity score used by the popularity sort
    pub fn popularity(&self) -> u64 {
        u64::from(self.citation_count) * 2 + u64::from(self.download_count)
    }
}

/// Builder for constructing Resource objects
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    /// Create a new builder with required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: i32,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            resource: Resource::new(id, title, year, resource_type),
        }
    }

    /// Set authors
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set journal
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.resource.journal = Some(journal.into());
        self
    }

    /// Set publisher
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.resource.publisher = Some(publisher.into());
        self
    }

    /// Set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.resource.description = description.into();
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.resource.doi = Some(doi.into());
        self
    }

    /// Set landing page URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.resource.url = Some(url.into());
        self
    }

    /// Set thumbnail URL
    pub fn thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.resource.thumbnail_url = Some(url.into());
        self
    }

    /// Set tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set download count
    pub fn downloads(mut self, count: u32) -> Self {
        self.resource.download_count = count;
        self
    }

    /// Set citation count
    pub fn citations(mut self, count: u32) -> Self {
        self.resource.citation_count = count;
        self
    }

    /// Set view count
    pub fn views(mut self, count: u32) -> Self {
        self.resource.view_count = Some(count);
        self
    }

    /// Build the Resource
    pub fn build(self) -> Resource {
        self.resource
    }
}

/// A resource linked from a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedResource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub relationship: String,
}

/// Full detail record for a single resource
///
/// Shares its id with a [`Resource`] but is fetched independently, so the two
/// may drift; nothing here is derived from the search snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResource {
    #[serde(flatten)]
    pub resource: Resource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_resources: Vec<RelatedResource>,
}

impl DetailResource {
    /// Wrap a resource with no extended metadata
    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            r#abstract: None,
            keywords: Vec::new(),
            pages: None,
            volume: None,
            issue: None,
            isbn: None,
            language: None,
            publication_date: None,
            affiliations: Vec::new(),
            references: Vec::new(),
            related_resources: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

impl std::ops::Deref for DetailResource {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.resource
    }
}
