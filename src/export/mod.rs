//! Export of result lists and single resources.
//!
//! Result lists export as CSV or JSON. A single resource additionally
//! exports as RIS or BibTeX; lists in those formats are the per-resource
//! entries separated by blank lines.

mod citation;

pub use citation::{detail_citation, format_authors, format_citation, CitationStyle};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{DetailResource, Resource, ResourceType};

const RESULT_CSV_HEADERS: [&str; 12] = [
    "id",
    "title",
    "authors",
    "year",
    "type",
    "journal",
    "publisher",
    "doi",
    "url",
    "citationCount",
    "downloadCount",
    "viewCount",
];

const DETAIL_CSV_HEADERS: [&str; 9] = [
    "id", "title", "authors", "year", "type", "journal", "publisher", "doi", "url",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Ris,
    Bibtex,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Ris => "ris",
            ExportFormat::Bibtex => "bib",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Ris => "application/x-research-info-systems",
            ExportFormat::Bibtex => "application/x-bibtex",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "ris" => Ok(ExportFormat::Ris),
            "bibtex" | "bib" => Ok(ExportFormat::Bibtex),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which results a list export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// The current page
    #[default]
    Page,
    /// Every sorted result
    All,
}

impl ExportScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportScope::Page => "page",
            ExportScope::All => "all",
        }
    }
}

impl FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "page" => Ok(ExportScope::Page),
            "all" => Ok(ExportScope::All),
            _ => Err(format!("Unknown export scope: {}", s)),
        }
    }
}

/// `search-results-<scope>.<ext>`
pub fn results_file_name(scope: ExportScope, format: ExportFormat) -> String {
    format!("search-results-{}.{}", scope.as_str(), format.extension())
}

/// `<id>.<ext>`
pub fn resource_file_name(id: &str, format: ExportFormat) -> String {
    format!("{}.{}", id, format.extension())
}

/// Render a list of results
pub fn export_results(items: &[Resource], format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::Csv => results_csv(items),
        ExportFormat::Json => serde_json::to_string_pretty(items)?,
        ExportFormat::Ris | ExportFormat::Bibtex => items
            .iter()
            .map(|item| {
                let detail = DetailResource::from_resource(item.clone());
                match format {
                    ExportFormat::Ris => to_ris(&detail),
                    _ => to_bibtex(&detail),
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    })
}

/// Render a single detail resource
pub fn export_resource(resource: &DetailResource, format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::Csv => detail_csv(resource),
        ExportFormat::Json => serde_json::to_string_pretty(resource)?,
        ExportFormat::Ris => to_ris(resource),
        ExportFormat::Bibtex => to_bibtex(resource),
    })
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row(values: &[String]) -> String {
    values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(",")
}

fn base_columns(resource: &Resource) -> Vec<String> {
    vec![
        resource.id.clone(),
        resource.title.clone(),
        resource.authors.join("; "),
        resource.year.to_string(),
        resource.resource_type.id().to_string(),
        resource.journal.clone().unwrap_or_default(),
        resource.publisher.clone().unwrap_or_default(),
        resource.doi.clone().unwrap_or_default(),
        resource.url.clone().unwrap_or_default(),
    ]
}

/// Every field quoted, one result per line, no trailing newline
pub fn results_csv(items: &[Resource]) -> String {
    let mut lines = vec![RESULT_CSV_HEADERS.join(",")];
    lines.extend(items.iter().map(|item| {
        let mut row = base_columns(item);
        row.push(item.citation_count.to_string());
        row.push(item.download_count.to_string());
        row.push(item.view_count.map(|v| v.to_string()).unwrap_or_default());
        csv_row(&row)
    }));
    lines.join("\n")
}

pub fn detail_csv(resource: &DetailResource) -> String {
    format!(
        "{}\n{}",
        DETAIL_CSV_HEADERS.join(","),
        csv_row(&base_columns(resource))
    )
}

pub fn to_ris(resource: &DetailResource) -> String {
    let mut lines = vec![format!("TY  - {}", resource.resource_type.ris_code())];
    lines.extend(resource.authors.iter().map(|a| format!("AU  - {}", a)));
    lines.push(format!("TI  - {}", resource.title));

    let optional = [
        ("JO", resource.journal.as_deref()),
        ("PB", resource.publisher.as_deref()),
        ("VL", resource.volume.as_deref()),
        ("IS", resource.issue.as_deref()),
        ("SP", resource.pages.as_deref()),
    ];
    for (tag, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            lines.push(format!("{}  - {}", tag, value));
        }
    }

    lines.push(format!("PY  - {}", resource.year));
    if let Some(doi) = resource.doi.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("DO  - {}", doi));
    }
    lines.push("ER  - ".to_string());
    lines.join("\n")
}

/// Key is the first word of the first author followed by the year
pub fn bibtex_key(resource: &Resource) -> String {
    let first = resource
        .authors
        .first()
        .map(String::as_str)
        .unwrap_or("author");
    let token = first.split(' ').next().unwrap_or(first);
    format!("{}{}", token, resource.year)
}

pub fn to_bibtex(resource: &DetailResource) -> String {
    let key = bibtex_key(resource);
    let authors = resource
        .authors
        .iter()
        .map(|a| a.replace(',', ""))
        .collect::<Vec<_>>()
        .join(" and ");
    let or_empty = |value: &Option<String>| value.clone().unwrap_or_default();

    match resource.resource_type {
        ResourceType::Article => format!(
            "@article{{{},\n  title={{{}}},\n  author={{{}}},\n  journal={{{}}},\n  year={{{}}},\n  volume={{{}}},\n  number={{{}}},\n  pages={{{}}},\n  doi={{{}}}\n}}",
            key,
            resource.title,
            authors,
            or_empty(&resource.journal),
            resource.year,
            or_empty(&resource.volume),
            or_empty(&resource.issue),
            or_empty(&resource.pages),
            or_empty(&resource.doi),
        ),
        ResourceType::Book => format!(
            "@book{{{},\n  title={{{}}},\n  author={{{}}},\n  publisher={{{}}},\n  year={{{}}},\n  isbn={{{}}}\n}}",
            key,
            resource.title,
            authors,
            or_empty(&resource.publisher),
            resource.year,
            or_empty(&resource.isbn),
        ),
        ResourceType::Thesis => format!(
            "@misc{{{},\n  title={{{}}},\n  author={{{}}},\n  year={{{}}}\n}}",
            key, resource.title, authors, resource.year
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::models::ResourceBuilder;

    fn quoted_title() -> Resource {
        ResourceBuilder::new("q1", "The \"Best\" Paper", 2020, ResourceType::Thesis)
            .authors(["Doe, J.", "Roe, R."])
            .build()
    }

    #[test]
    fn test_results_csv() {
        let csv = results_csv(&[quoted_title()]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "id,title,authors,year,type,journal,publisher,doi,url,citationCount,downloadCount,viewCount"
        );
        assert_eq!(
            lines[1],
            r#""q1","The ""Best"" Paper","Doe, J.; Roe, R.","2020","thesis","","","","","0","0","""#
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_empty_results_csv_is_header_only() {
        assert_eq!(results_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn test_detail_csv_has_nine_columns() {
        let detail = fixtures::detail_resource("1").unwrap();
        let csv = detail_csv(&detail);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap().split(',').count(), 9);
        assert!(lines.next().unwrap().starts_with("\"1\","));
    }

    #[test]
    fn test_json_is_pretty_camel_case() {
        let json = export_results(&fixtures::search_results()[..1], ExportFormat::Json).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": \"1\""));
        assert!(json.contains("\"downloadCount\": 1247"));
        assert!(json.contains("\"type\": \"article\""));
    }

    #[test]
    fn test_ris() {
        let mut detail = DetailResource::from_resource(quoted_title());
        detail.pages = Some("1-10".to_string());
        assert_eq!(
            to_ris(&detail),
            "TY  - THES\nAU  - Doe, J.\nAU  - Roe, R.\nTI  - The \"Best\" Paper\nSP  - 1-10\nPY  - 2020\nER  - "
        );
    }

    #[test]
    fn test_bibtex() {
        let detail = DetailResource::from_resource(quoted_title());
        assert_eq!(bibtex_key(&detail), "Doe,2020");
        assert_eq!(
            to_bibtex(&detail),
            "@misc{Doe,2020,\n  title={The \"Best\" Paper},\n  author={Doe J. and Roe R.},\n  year={2020}\n}"
        );

        let article = fixtures::detail_resource("1").unwrap();
        let entry = to_bibtex(&article);
        assert!(entry.starts_with("@article{"));
        assert!(entry.contains("  journal={"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            results_file_name(ExportScope::All, ExportFormat::Csv),
            "search-results-all.csv"
        );
        assert_eq!(resource_file_name("42", ExportFormat::Bibtex), "42.bib");
        assert_eq!("bib".parse::<ExportFormat>().unwrap(), ExportFormat::Bibtex);
    }
}
