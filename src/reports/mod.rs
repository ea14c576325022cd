pub mod excel;
pub mod filter;
pub mod render;
pub mod summary;

use crate::models::registry::RecordType;

/// Output format of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    View,
    Excel,
}

/// One report query, shared verbatim by the on-screen fetch and the export
/// fetch so the two paths can never drift apart in filter semantics.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub record_type: RecordType,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub format: ReportFormat,
}

impl ReportQuery {
    pub fn new(record_type: RecordType) -> Self {
        ReportQuery {
            record_type,
            year: None,
            branch: None,
            format: ReportFormat::View,
        }
    }

    pub fn with_year(mut self, year: Option<String>) -> Self {
        self.year = year.filter(|y| !y.is_empty());
        self
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch.filter(|b| !b.is_empty());
        self
    }

    pub fn for_export(mut self) -> Self {
        self.format = ReportFormat::Excel;
        self
    }

    /// Encode as URL query parameters for `GET /reports/data`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("type".to_string(), self.record_type.name().to_string())];
        if let Some(year) = &self.year {
            params.push(("year".to_string(), year.clone()));
        }
        if let Some(branch) = &self.branch {
            params.push(("branch".to_string(), branch.clone()));
        }
        if self.format == ReportFormat::Excel {
            params.push(("format".to_string(), "excel".to_string()));
        }
        params
    }

    /// Download filename for the exported spreadsheet.
    pub fn export_filename(&self) -> String {
        format!(
            "{}_{}_report.xlsx",
            self.record_type.slug(),
            self.year.as_deref().unwrap_or("all")
        )
    }
}
