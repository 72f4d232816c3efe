// Publish canonical rows into the worksheet of their topology.
// The worksheet header is widened before appending when it is narrower than a row.

mod schema;

pub use schema::{
    CLUSTER_SCHEMA, Column, INSTANCE_SCHEMA, SERVERLESS_SCHEMA, SheetSchema, TIMESTAMP_FORMAT,
    schema_for,
};

use serde::Serialize;
use tracing::instrument;

use crate::models::BenchmarkRow;
use crate::sink::TabularSink;
use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishReport {
    pub worksheet: String,
    pub created: bool,
    pub header_widened: bool,
    pub rows_appended: u64,
}

/// A header narrower than the rows about to be appended must grow first.
pub fn needs_widen(header_len: usize, row_len: usize) -> bool {
    header_len < row_len
}

pub struct Publisher<S> {
    sink: S,
}

impl<S: TabularSink> Publisher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[instrument(skip(self, rows), fields(operation = "publish", rows_count = rows.len()))]
    pub async fn publish(
        &self,
        topology: Topology,
        rows: &[BenchmarkRow],
    ) -> anyhow::Result<PublishReport> {
        let schema = schema_for(topology);
        let mut report = PublishReport {
            worksheet: schema.worksheet.to_string(),
            created: false,
            header_widened: false,
            rows_appended: 0,
        };
        if rows.is_empty() {
            tracing::info!(worksheet = schema.worksheet, "No results found");
            return Ok(report);
        }

        let full_header = schema.header();
        report.created = self
            .sink
            .ensure_worksheet(schema.worksheet, &full_header)
            .await?;
        if report.created {
            tracing::info!(worksheet = schema.worksheet, "created worksheet");
        }

        let header = self.sink.read_header(schema.worksheet).await?;
        if needs_widen(header.len(), schema.width()) {
            let missing = &full_header[header.len()..];
            tracing::info!(
                worksheet = schema.worksheet,
                from = header.len(),
                to = schema.width(),
                "widening header"
            );
            self.sink.widen_header(schema.worksheet, missing).await?;
            report.header_widened = true;
        }

        let cells: Vec<_> = rows.iter().map(|r| schema.render(r)).collect();
        report.rows_appended = self.sink.append_rows(schema.worksheet, &cells).await?;
        tracing::info!(
            worksheet = schema.worksheet,
            rows = report.rows_appended,
            "published results"
        );
        Ok(report)
    }
}
