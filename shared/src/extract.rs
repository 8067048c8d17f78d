use crate::{core::Point, error::PointError, projection};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

/// Canvas width at or below which a point is counted as captured on a mobile device.
pub const MOBILE_MAX_WIDTH: f64 = 500.0;

pub const EXTRACT_HEADER: [&str; 5] = ["country", "tries", "mobile", "lat", "long"];

/// One row of a published extract. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub country: String,
    pub tries: u32,
    pub mobile: u8,
    pub lat: f64,
    pub long: f64,
}

pub fn transform(point: &Point) -> Result<OutputRecord, PointError> {
    let location = projection::project(point.width, point.height, point.x, point.y)?;

    Ok(OutputRecord {
        country: point.country.clone(),
        tries: point.tries,
        mobile: if point.width <= MOBILE_MAX_WIDTH { 1 } else { 0 },
        lat: location.lat,
        long: location.long,
    })
}

/// Uniform sample without replacement: shuffles everything, then keeps the first `capacity`.
pub fn sample<T, R: Rng + ?Sized>(mut records: Vec<T>, capacity: usize, rng: &mut R) -> Vec<T> {
    records.shuffle(rng);
    records.truncate(capacity);
    records
}

/// Tab separated text with a header row, quoting only fields that need it.
pub fn to_tsv(records: &[OutputRecord]) -> Result<String, PointError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(vec![]);
    writer
        .write_record(EXTRACT_HEADER)
        .map_err(|e| PointError::Serialization(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| PointError::Serialization(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PointError::Serialization(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| PointError::Serialization(e.to_string()))
}
