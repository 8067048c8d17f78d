use crate::error::PointError;
use async_trait::async_trait;
use cuid2::CuidConstructor;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait PointRepository: Debug {
    async fn append(&self, point: Point) -> Result<Point, PointError>;
    async fn scan_page(
        &self,
        filter: &ScanFilter,
        cursor: Option<ScanCursor>,
    ) -> Result<ScanPage, PointError>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait IdGenerator {
    fn generate_id(&self) -> String;
}

pub struct CuidGenerator {
    gen: CuidConstructor,
}

impl CuidGenerator {
    pub fn new() -> Self {
        Self {
            gen: CuidConstructor::new(),
        }
    }
}

impl Default for CuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for CuidGenerator {
    fn generate_id(&self) -> String {
        self.gen.create_id()
    }
}

/// Source of millisecond timestamps.
#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait Clock {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub country: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tries: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Point {
    /// A freshly created point: both timestamps are the creation time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        country: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        tries: u32,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            country,
            x,
            y,
            width,
            height,
            tries,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn validate(&self) -> Result<(), PointError> {
        if self.country.trim().is_empty() {
            return Err(PointError::Validation("Needs a country.".to_string()));
        }
        Ok(())
    }
}

/// Selects the points that take part in a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFilter {
    pub min_tries: u32,
    pub max_tries: u32,
    pub created_before: i64,
}

impl ScanFilter {
    pub fn new(min_tries: u32, max_tries: u32, created_before: i64) -> Self {
        Self {
            min_tries,
            max_tries,
            created_before,
        }
    }

    /// Same predicate the store evaluates server side, both bounds inclusive.
    pub fn matches(&self, point: &Point) -> bool {
        (self.min_tries..=self.max_tries).contains(&point.tries)
            && point.created_at <= self.created_before
    }
}

/// Position to resume a scan from. Only the repository that produced it knows what it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanCursor(String);

impl ScanCursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScanPage {
    pub points: Vec<Point>,
    pub cursor: Option<ScanCursor>,
}

impl ScanPage {
    pub fn new(points: Vec<Point>, cursor: Option<ScanCursor>) -> Self {
        Self { points, cursor }
    }

    pub fn last(points: Vec<Point>) -> Self {
        Self {
            points,
            cursor: None,
        }
    }
}
