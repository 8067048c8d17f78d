use crate::extract_publisher::ExtractPublisher;
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use shared::core::{Clock, Point, PointRepository, ScanFilter};
use shared::error::PointError;
use shared::extract::{sample, to_tsv, transform, OutputRecord};

pub(crate) struct SummarySettings {
    pub min_tries: u32,
    pub max_tries: u32,
    pub created_before: Option<i64>,
    pub sample_size: usize,
    pub full_extract_key: String,
    pub sampled_extract_key: String,
}

pub(crate) struct HandlerDeps<R: PointRepository, P: ExtractPublisher, C: Clock> {
    pub point_repo: R,
    pub publisher: P,
    pub clock: C,
    pub settings: SummarySettings,
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct SummaryReport {
    pub scanned: usize,
    pub published: usize,
    pub sampled: usize,
    pub skipped: usize,
}

/// Rebuilds both extracts from a full scan. Nothing is published unless the whole scan succeeds.
#[tracing::instrument(skip(deps, _event))]
pub(crate) async fn function_handler<R: PointRepository, P: ExtractPublisher, C: Clock>(
    deps: &HandlerDeps<R, P, C>,
    _event: LambdaEvent<Value>,
) -> Result<SummaryReport, Error> {
    let settings = &deps.settings;
    let filter = ScanFilter::new(
        settings.min_tries,
        settings.max_tries,
        settings
            .created_before
            .unwrap_or_else(|| deps.clock.now_millis()),
    );
    tracing::info!("Summarizing points matching {:?}", filter);

    let points = scan_all(&deps.point_repo, &filter).await?;
    let scanned = points.len();
    let records = transform_all(&points);
    let skipped = scanned - records.len();

    let full_extract = to_tsv(&records)?;
    let published = records.len();
    let sampled_records = sample(records, settings.sample_size, &mut rand::thread_rng());
    let sampled_extract = to_tsv(&sampled_records)?;

    tokio::try_join!(
        deps.publisher
            .publish(&settings.full_extract_key, full_extract),
        deps.publisher
            .publish(&settings.sampled_extract_key, sampled_extract),
    )?;

    let report = SummaryReport {
        scanned,
        published,
        sampled: sampled_records.len(),
        skipped,
    };
    tracing::info!("Summary published: {:?}", report);
    Ok(report)
}

/// Follows scan cursors one page at a time until the store reports no more pages.
async fn scan_all<R: PointRepository>(
    point_repo: &R,
    filter: &ScanFilter,
) -> Result<Vec<Point>, PointError> {
    let mut points = vec![];
    let mut cursor = None;
    let mut pages = 0;
    loop {
        let page = point_repo.scan_page(filter, cursor).await?;
        pages += 1;
        points.extend(page.points);
        cursor = match page.cursor {
            Some(next) => Some(next),
            None => break,
        };
    }
    tracing::debug!("Scanned {} points over {} pages", points.len(), pages);
    Ok(points)
}

fn transform_all(points: &[Point]) -> Vec<OutputRecord> {
    points
        .iter()
        .filter_map(|point| match transform(point) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping point {}: {}", point.id, e);
                None
            }
        })
        .collect()
}
