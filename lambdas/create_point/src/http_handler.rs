use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use serde::Deserialize;
use serde_json::Value;
use shared::core::{Clock, IdGenerator, Point, PointRepository};
use shared::error::PointError;
use shared::utils::{json_response, message_response};

const MISSING_COUNTRY: &str = "Needs a country.";
const STORE_FAILED: &str = "Couldn't create the item.";

#[derive(Debug, Deserialize)]
pub struct CreatePointRequest {
    // kept loose so a non-string country gets the same answer as a missing one
    pub country: Option<Value>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tries: u32,
}

pub(crate) struct HandlerDeps<I: IdGenerator, C: Clock, R: PointRepository> {
    pub id_generator: I,
    pub clock: C,
    pub point_repo: R,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler<I: IdGenerator, C: Clock, R: PointRepository>(
    deps: &HandlerDeps<I, C, R>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    tracing::info!("Received event: {:?}", event);

    let request = match serde_json::from_slice::<CreatePointRequest>(event.body()) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Validation Failed: {}", e);
            return message_response(
                &StatusCode::NOT_IMPLEMENTED,
                &format!("Invalid point: {}", e),
            );
        }
    };
    let country = match request
        .country
        .as_ref()
        .and_then(Value::as_str)
        .filter(|country| !country.trim().is_empty())
    {
        Some(country) => country.to_string(),
        None => {
            tracing::error!("Validation Failed: missing country");
            return message_response(&StatusCode::NOT_IMPLEMENTED, MISSING_COUNTRY);
        }
    };

    let point = Point::new(
        deps.id_generator.generate_id(),
        country,
        request.x,
        request.y,
        request.width,
        request.height,
        request.tries,
        deps.clock.now_millis(),
    );
    match deps.point_repo.append(point).await {
        Ok(point) => json_response(&StatusCode::OK, &point),
        Err(PointError::Validation(message)) => {
            tracing::error!("Validation Failed: {}", message);
            message_response(&StatusCode::NOT_IMPLEMENTED, &message)
        }
        Err(e) => {
            tracing::error!("Failed to store point: {:?}", e);
            let status = e
                .store_status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::NOT_IMPLEMENTED);
            message_response(&status, STORE_FAILED)
        }
    }
}
