use crate::config::Config;
use crate::http_handler::HandlerDeps;
use http_handler::function_handler;
use lambda_http::{run, service_fn, tracing, Error};
use shared::adapters::DynamoDbPointRepository;
use shared::core::{CuidGenerator, SystemClock};

mod config;
mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);
    let config = Config::load()?;
    let point_repo = DynamoDbPointRepository::new(config.table_name, dynamodb_client);
    let deps = HandlerDeps {
        id_generator: CuidGenerator::new(),
        clock: SystemClock,
        point_repo,
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
