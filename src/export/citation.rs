//! Citation strings for the cite dialog and the detail page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{DetailResource, Resource, ResourceType};

/// Citation style offered by the cite dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
    Chicago,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 3] = [CitationStyle::Apa, CitationStyle::Mla, CitationStyle::Chicago];

    pub fn label(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Mla => "MLA",
            CitationStyle::Chicago => "Chicago",
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apa" => Ok(CitationStyle::Apa),
            "mla" => Ok(CitationStyle::Mla),
            "chicago" => Ok(CitationStyle::Chicago),
            _ => Err(format!("Unknown citation style: {}", s)),
        }
    }
}

/// Byline of a result card: up to three names, then "et al."
pub fn format_authors(authors: &[String]) -> String {
    if authors.len() <= 3 {
        authors.join(", ")
    } else {
        format!("{} et al.", authors[..3].join(", "))
    }
}

/// Short citation of a search result in the given style
pub fn format_citation(resource: &Resource, style: CitationStyle) -> String {
    let authors = resource.authors.join(", ");
    let venue = resource.venue().unwrap_or("");
    let year = resource.year;
    let title = &resource.title;

    match style {
        CitationStyle::Apa => format!("{} ({}). {}. {}.", authors, year, title, venue),
        CitationStyle::Mla => format!("{}. \"{}.\" {}, {}.", authors, title, venue, year),
        CitationStyle::Chicago => format!("{}. {}. {}. {}.", authors, year, title, venue),
    }
}

/// Full citation shown on the detail page, shaped by resource type
pub fn detail_citation(resource: &DetailResource) -> String {
    let lead = format!(
        "{} ({}). {}.",
        resource.authors.join(", "),
        resource.year,
        resource.title
    );

    match resource.resource_type {
        ResourceType::Article => {
            let mut citation = format!(
                "{} {}",
                lead,
                resource.journal.as_deref().unwrap_or("Unknown Journal")
            );
            if let Some(volume) = &resource.volume {
                citation.push_str(&format!(", {}", volume));
            }
            if let Some(issue) = &resource.issue {
                citation.push_str(&format!("({})", issue));
            }
            if let Some(pages) = &resource.pages {
                citation.push_str(&format!(", {}", pages));
            }
            citation.push('.');
            if let Some(doi) = &resource.doi {
                citation.push_str(&format!(" https://doi.org/{}", doi));
            }
            citation
        }
        ResourceType::Book => {
            let mut citation = format!(
                "{} {}.",
                lead,
                resource.publisher.as_deref().unwrap_or("Unknown Publisher")
            );
            if let Some(isbn) = &resource.isbn {
                citation.push_str(&format!(" ISBN: {}", isbn));
            }
            citation
        }
        ResourceType::Thesis => format!(
            "{} [Thesis]. {}.",
            lead,
            resource
                .affiliations
                .first()
                .map(String::as_str)
                .unwrap_or("Unknown Institution")
        ),
    }
}
