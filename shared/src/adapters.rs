use crate::{
    core::{Point, PointRepository, ScanCursor, ScanFilter, ScanPage},
    error::PointError,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::http::HttpResponse, error::SdkError, types::AttributeValue, Client,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::str::FromStr;

const SCAN_FILTER_EXPRESSION: &str =
    "tries BETWEEN :min_tries AND :max_tries AND createdAt <= :created_before";

#[derive(Debug)]
pub struct DynamoDbPointRepository {
    table_name: String,
    dynamodb_client: Client,
    page_size: Option<i32>,
}

impl DynamoDbPointRepository {
    pub fn new(table_name: String, dynamodb_client: Client) -> Self {
        Self {
            table_name,
            dynamodb_client,
            page_size: None,
        }
    }

    /// Caps the number of items DynamoDB evaluates per scan request.
    pub fn with_page_size(mut self, page_size: Option<i32>) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl PointRepository for DynamoDbPointRepository {
    async fn append(&self, point: Point) -> Result<Point, PointError> {
        point.validate()?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(HashMap::from(&point)))
            .send()
            .await
            .map(|_| point)
            .map_err(|e| store_error("Error adding item", e))
    }

    async fn scan_page(
        &self,
        filter: &ScanFilter,
        cursor: Option<ScanCursor>,
    ) -> Result<ScanPage, PointError> {
        let mut scan = self
            .dynamodb_client
            .scan()
            .table_name(&self.table_name)
            .filter_expression(SCAN_FILTER_EXPRESSION)
            .expression_attribute_values(
                ":min_tries",
                AttributeValue::N(filter.min_tries.to_string()),
            )
            .expression_attribute_values(
                ":max_tries",
                AttributeValue::N(filter.max_tries.to_string()),
            )
            .expression_attribute_values(
                ":created_before",
                AttributeValue::N(filter.created_before.to_string()),
            );
        if let Some(page_size) = self.page_size {
            scan = scan.limit(page_size);
        }
        if let Some(cursor) = cursor {
            scan = scan.exclusive_start_key("id", AttributeValue::S(cursor.as_str().to_string()));
        }
        let result = scan
            .send()
            .await
            .map_err(|e| store_error("Error executing scan", e))?;

        let mut points = vec![];
        if let Some(items) = result.items {
            for item in items {
                match Point::try_from(item) {
                    Ok(point) => points.push(point),
                    Err(e) => tracing::warn!("Skipping undecodable item: {}", e),
                }
            }
        }
        let cursor = cursor_from_key(result.last_evaluated_key)?;

        Ok(ScanPage::new(points, cursor))
    }
}

/// Turns DynamoDB's `LastEvaluatedKey` into the cursor for the next page. No key means no more pages.
fn cursor_from_key(
    last_evaluated_key: Option<HashMap<String, AttributeValue>>,
) -> Result<Option<ScanCursor>, PointError> {
    match last_evaluated_key {
        Some(key) => key
            .get("id")
            .and_then(|id| id.as_s().ok())
            .map(|id| Some(ScanCursor::new(id.as_str())))
            .ok_or_else(|| PointError::store("LastEvaluatedKey has no id")),
        None => Ok(None),
    }
}

fn store_error<E: Debug>(context: &str, err: SdkError<E, HttpResponse>) -> PointError {
    let status = err.raw_response().map(|response| response.status().as_u16());
    PointError::StoreUnavailable {
        message: format!("{}: {:?}", context, err),
        status,
    }
}

impl From<&Point> for HashMap<String, AttributeValue> {
    fn from(point: &Point) -> Self {
        HashMap::from([
            ("id".to_string(), AttributeValue::S(point.id.clone())),
            ("country".to_string(), AttributeValue::S(point.country.clone())),
            ("x".to_string(), AttributeValue::N(point.x.to_string())),
            ("y".to_string(), AttributeValue::N(point.y.to_string())),
            ("width".to_string(), AttributeValue::N(point.width.to_string())),
            ("height".to_string(), AttributeValue::N(point.height.to_string())),
            ("tries".to_string(), AttributeValue::N(point.tries.to_string())),
            (
                "createdAt".to_string(),
                AttributeValue::N(point.created_at.to_string()),
            ),
            (
                "updatedAt".to_string(),
                AttributeValue::N(point.updated_at.to_string()),
            ),
        ])
    }
}

impl TryFrom<HashMap<String, AttributeValue>> for Point {
    type Error = String;

    fn try_from(item: HashMap<String, AttributeValue>) -> Result<Self, Self::Error> {
        Ok(Point {
            id: string_attribute(&item, "id")?,
            country: string_attribute(&item, "country")?,
            x: number_attribute(&item, "x")?,
            y: number_attribute(&item, "y")?,
            width: number_attribute(&item, "width")?,
            height: number_attribute(&item, "height")?,
            tries: number_attribute(&item, "tries")?,
            created_at: number_attribute(&item, "createdAt")?,
            updated_at: number_attribute(&item, "updatedAt")?,
        })
    }
}

fn string_attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, String> {
    item.get(name)
        .ok_or_else(|| format!("{} not found", name))?
        .as_s()
        .map(|s| s.to_string())
        .map_err(|_| format!("{} is not a String", name))
}

fn number_attribute<T: FromStr>(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<T, String> {
    item.get(name)
        .ok_or_else(|| format!("{} not found", name))?
        .as_n()
        .map_err(|_| format!("{} is not a number", name))
        .and_then(|n| {
            n.parse::<T>()
                .map_err(|_| format!("Cannot convert {} from {}", name, n))
        })
}
