use lambda_http::http::StatusCode;
use lambda_http::{Error, Response};
use serde::Serialize;
use serde_json::json;

/// JSON response readable from any origin.
pub fn json_response(
    status: &StatusCode,
    body: &impl Serialize,
) -> Result<Response<String>, Error> {
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Credentials", "true")
        .body(serde_json::to_string(&body)?)
        .map_err(Box::new)?;

    Ok(response)
}

pub fn message_response(status: &StatusCode, message: &str) -> Result<Response<String>, Error> {
    json_response(status, &json!({ "message": message }))
}
