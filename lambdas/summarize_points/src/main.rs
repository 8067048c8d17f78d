use crate::config::Config;
use crate::event_handler::{HandlerDeps, SummarySettings};
use crate::extract_publisher::S3ExtractPublisher;
use event_handler::function_handler;
use lambda_runtime::{run, service_fn, tracing, Error};
use shared::adapters::DynamoDbPointRepository;
use shared::core::SystemClock;

mod config;
mod event_handler;
mod extract_publisher;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let config = Config::load()?;

    let point_repo =
        DynamoDbPointRepository::new(config.table_name, aws_sdk_dynamodb::Client::new(&aws_config))
            .with_page_size(config.page_size);
    let publisher = S3ExtractPublisher::new(aws_sdk_s3::Client::new(&aws_config), config.bucket);
    let settings = SummarySettings {
        min_tries: config.min_tries,
        max_tries: config.max_tries,
        created_before: config.created_before,
        sample_size: config.sample_size,
        full_extract_key: config.full_extract_key,
        sampled_extract_key: config.sampled_extract_key,
    };
    let handler_deps = HandlerDeps {
        point_repo,
        publisher,
        clock: SystemClock,
        settings,
    };

    run(service_fn(|event| function_handler(&handler_deps, event))).await
}
