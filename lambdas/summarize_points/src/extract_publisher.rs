use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl};
use lambda_runtime::tracing;
use shared::error::PointError;

#[cfg(test)]
use mockall::automock;

const CACHE_CONTROL: &str = "max-age=120,public";
const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

#[cfg_attr(test, automock)]
pub(crate) trait ExtractPublisher {
    async fn publish(&self, key: &str, body: String) -> Result<(), PointError>;
}

/// Publishes extracts as world readable objects that clients may cache for two minutes.
pub(crate) struct S3ExtractPublisher {
    s3_client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ExtractPublisher {
    pub fn new(s3_client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { s3_client, bucket }
    }
}

impl ExtractPublisher for S3ExtractPublisher {
    async fn publish(&self, key: &str, body: String) -> Result<(), PointError> {
        let size = body.len();
        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body.into_bytes()))
            .acl(ObjectCannedAcl::PublicRead)
            .cache_control(CACHE_CONTROL)
            .content_type(CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| PointError::SinkUnavailable(format!("Error uploading {}: {:?}", key, e)))?;

        tracing::info!("Published {} ({} bytes) to {}", key, size, self.bucket);
        Ok(())
    }
}
