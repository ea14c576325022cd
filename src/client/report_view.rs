use serde_json::Value;

use crate::client::api::ApiClient;
use crate::client::transport::Transport;
use crate::client::ClientError;
use crate::models::registry::{self, ColumnDef};
use crate::reports::filter::ViewFilter;
use crate::reports::ReportQuery;

/// The report screen's state: one server-side query (type, year, branch)
/// plus the fetched rows and the client-side view filter applied on top.
///
/// Export deliberately reuses the same query the rows were fetched with,
/// so the spreadsheet always covers the full fetched set regardless of
/// what the view filter currently hides.
pub struct ReportView {
    query: ReportQuery,
    rows: Vec<Value>,
    filter: ViewFilter,
    years: Vec<String>,
}

impl ReportView {
    pub fn new(query: ReportQuery) -> Self {
        ReportView {
            query,
            rows: Vec::new(),
            filter: ViewFilter::default(),
            years: Vec::new(),
        }
    }

    pub fn query(&self) -> &ReportQuery {
        &self.query
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Fetch the report data for the current query. A summary report comes
    /// back wrapped in an envelope; its `data` array is what we keep.
    pub fn load<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), ClientError> {
        let response = client.get("/reports/data", self.query.to_params())?;
        let body = response.json().unwrap_or(Value::Null);
        self.rows = match body {
            Value::Array(rows) => rows,
            Value::Object(mut obj) => match obj.remove("data") {
                Some(Value::Array(rows)) => rows,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(())
    }

    /// Fetch the distinct academic years for the year dropdown.
    pub fn load_years<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), ClientError> {
        let response = client.get("/reports/academic-years", Vec::new())?;
        self.years = response
            .json()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        Ok(())
    }

    /// Replace the view filter. Purely local, no refetch.
    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    /// The fetched rows with the view filter applied.
    pub fn visible_rows(&self) -> Vec<&Value> {
        self.filter.apply(&self.rows)
    }

    /// Column layout for the current type, inferred from the first row
    /// when the type has no registered configuration.
    pub fn columns(&self) -> Vec<ColumnDef> {
        let configured = registry::lookup(self.query.record_type.name()).columns;
        if !configured.is_empty() {
            return configured;
        }
        self.rows
            .first()
            .map(registry::infer_columns)
            .unwrap_or_default()
    }

    /// Download the spreadsheet for the same query the view was loaded
    /// with. Returns the suggested filename alongside the bytes.
    pub fn export<T: Transport>(
        &self,
        client: &ApiClient<T>,
    ) -> Result<(String, Vec<u8>), ClientError> {
        let query = self.query.clone().for_export();
        let response = client.get("/reports/data", query.to_params())?;
        Ok((query.export_filename(), response.body))
    }
}
