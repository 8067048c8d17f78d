use aws_sdk_cloudformation::types::Output;
use reqwest::Client;
use shared::core::Point;
use shared::extract::EXTRACT_HEADER;
use std::env;

#[ignore]
#[tokio::test]
async fn when_valid_point_is_posted_should_store_and_return_it() {
    let api_endpoint = retrieve_stack_output("PointsApiEndpoint").await;
    let http_client = http_client();

    let response = http_client
        .post(format!("{}points", api_endpoint))
        .body(
            serde_json::json!({
                "country": "US",
                "x": 250,
                "y": 250,
                "width": 500,
                "height": 500,
                "tries": 2
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let point: Point = serde_json::from_str(response.text().await.unwrap().as_str()).unwrap();
    assert_eq!(point.country, "US");
    assert_eq!(point.tries, 2);
    assert!(!point.id.is_empty());
    assert_eq!(point.created_at, point.updated_at);
}

#[ignore]
#[tokio::test]
async fn when_country_is_missing_should_be_rejected() {
    let api_endpoint = retrieve_stack_output("PointsApiEndpoint").await;

    let response = http_client()
        .post(format!("{}points", api_endpoint))
        .body(serde_json::json!({"x": 1, "y": 1, "width": 500, "height": 500, "tries": 1}).to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 501);
}

#[ignore]
#[tokio::test]
async fn published_extracts_should_be_public_tsv() {
    let bucket_url = retrieve_stack_output("ExtractBucketUrl").await;
    let http_client = http_client();

    for key in ["tries.tsv", "sampled-tries.tsv"] {
        let response = http_client
            .get(format!("{}/{}", bucket_url.trim_end_matches('/'), key))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200, "{}", key);
        assert_eq!(response.headers()["cache-control"], "max-age=120,public");
        let body = response.text().await.unwrap();
        assert_eq!(body.lines().next(), Some(EXTRACT_HEADER.join("\t").as_str()));
    }
}

fn http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn retrieve_stack_output(output_key: &str) -> String {
    let config = aws_config::load_from_env().await;
    let cloudformation_client = aws_sdk_cloudformation::Client::new(&config);
    let stack_name = env::var("STACK_NAME").unwrap_or("tap-the-map-points".to_string());

    let get_stacks = cloudformation_client
        .describe_stacks()
        .set_stack_name(Some(stack_name))
        .send()
        .await
        .unwrap();

    let outputs = get_stacks.stacks.unwrap()[0].clone().outputs.unwrap();
    let matching: Vec<Output> = outputs
        .into_iter()
        .filter(|output| output.output_key.as_deref() == Some(output_key))
        .collect();

    matching[0].clone().output_value.unwrap()
}
