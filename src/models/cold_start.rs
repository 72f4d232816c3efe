// Cold-start probe events (cold_start_metrics.csv)

use serde::{Deserialize, Serialize};

/// Positional classification of a probe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    /// First request after an idle soak.
    #[serde(rename = "cold_start")]
    Cold,
    #[serde(rename = "warm_start")]
    Warm,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Cold => "cold_start",
            RequestType::Warm => "warm_start",
        }
    }

    pub fn is_cold(&self) -> bool {
        matches!(self, RequestType::Cold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdStartEvent {
    /// UTC, ISO-8601 without offset.
    pub timestamp: String,
    /// 1-based probe cycle this request belongs to.
    pub test_number: u32,
    pub request_type: RequestType,
    pub response_time_ms: f64,
    pub success: bool,
}

/// On-disk row shape; `is_cold_start` is derived from `request_type`.
#[derive(Serialize)]
pub(crate) struct ColdStartEventRow<'a> {
    timestamp: &'a str,
    test_number: u32,
    request_type: &'static str,
    is_cold_start: bool,
    response_time_ms: f64,
    success: bool,
}

impl ColdStartEvent {
    pub(crate) fn as_row(&self) -> ColdStartEventRow<'_> {
        ColdStartEventRow {
            timestamp: &self.timestamp,
            test_number: self.test_number,
            request_type: self.request_type.as_str(),
            is_cold_start: self.request_type.is_cold(),
            response_time_ms: self.response_time_ms,
            success: self.success,
        }
    }
}
