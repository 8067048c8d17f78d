use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    pub table_name: String,
    pub bucket: String,
    pub min_tries: u32,
    pub max_tries: u32,
    /// Millisecond cutoff on `createdAt`. The invocation time when unset.
    pub created_before: Option<i64>,
    pub sample_size: usize,
    pub page_size: Option<i32>,
    pub full_extract_key: String,
    pub sampled_extract_key: String,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::default("min_tries", 1))
            .merge(Serialized::default("max_tries", 5))
            .merge(Serialized::default("sample_size", 3000))
            .merge(Serialized::default("full_extract_key", "tries.tsv"))
            .merge(Serialized::default("sampled_extract_key", "sampled-tries.tsv"))
            .merge(Env::raw().only(&[
                "TABLE_NAME",
                "BUCKET",
                "MIN_TRIES",
                "MAX_TRIES",
                "CREATED_BEFORE",
                "SAMPLE_SIZE",
                "PAGE_SIZE",
                "FULL_EXTRACT_KEY",
                "SAMPLED_EXTRACT_KEY",
            ]))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn when_only_required_values_are_set_should_use_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TABLE_NAME", "points-test-table");
            jail.set_env("BUCKET", "points-test-bucket");

            let config = Config::load()?;

            assert_eq!(config.table_name, "points-test-table");
            assert_eq!(config.bucket, "points-test-bucket");
            assert_eq!(config.min_tries, 1);
            assert_eq!(config.max_tries, 5);
            assert_eq!(config.created_before, None);
            assert_eq!(config.sample_size, 3000);
            assert_eq!(config.page_size, None);
            assert_eq!(config.full_extract_key, "tries.tsv");
            assert_eq!(config.sampled_extract_key, "sampled-tries.tsv");
            Ok(())
        });
    }

    #[test]
    fn when_overrides_are_set_should_replace_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TABLE_NAME", "points-test-table");
            jail.set_env("BUCKET", "points-test-bucket");
            jail.set_env("MAX_TRIES", "3");
            jail.set_env("CREATED_BEFORE", "1700000000000");
            jail.set_env("SAMPLE_SIZE", "500");
            jail.set_env("PAGE_SIZE", "100");

            let config = Config::load()?;

            assert_eq!(config.max_tries, 3);
            assert_eq!(config.created_before, Some(1_700_000_000_000));
            assert_eq!(config.sample_size, 500);
            assert_eq!(config.page_size, Some(100));
            Ok(())
        });
    }

    #[test]
    fn when_bucket_is_missing_should_fail() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TABLE_NAME", "points-test-table");

            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
