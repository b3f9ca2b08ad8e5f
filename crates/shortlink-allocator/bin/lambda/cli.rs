use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};

pub const BUCKET_ENV: &str = "SHORTLINK_BUCKET";
pub const REGION_ENV: &str = "SHORTLINK_REGION";
pub const KEY_PREFIX_ENV: &str = "SHORTLINK_KEY_PREFIX";
pub const CDN_PREFIX_ENV: &str = "SHORTLINK_CDN_PREFIX";
pub const MAX_ATTEMPTS_ENV: &str = "SHORTLINK_MAX_ATTEMPTS";
pub const CONDITIONAL_WRITES_ENV: &str = "SHORTLINK_CONDITIONAL_WRITES";
pub const S3_ENDPOINT_ENV: &str = "SHORTLINK_S3_ENDPOINT";
pub const LOG_FORMAT_ENV: &str = "SHORTLINK_LOG_FORMAT";

pub const DEFAULT_KEY_PREFIX: &str = shortlink_allocator::service::DEFAULT_KEY_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "json")]
    Json,
    #[value(name = "text")]
    Text,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Text => write!(f, "text"),
        }
    }
}

/// Function configuration. Lambda starts the binary without arguments,
/// so every option is read from the environment.
#[derive(Debug, Parser)]
#[command(name = "shortlink-lambda")]
pub struct CLI {
    #[arg(long, env = BUCKET_ENV)]
    pub bucket: String,

    #[arg(long, env = REGION_ENV)]
    pub region: Option<String>,

    #[arg(long, env = KEY_PREFIX_ENV, default_value = DEFAULT_KEY_PREFIX)]
    pub key_prefix: String,

    #[arg(long, env = CDN_PREFIX_ENV)]
    pub cdn_prefix: Option<String>,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=10)
    )]
    pub max_attempts: u32,

    #[arg(
        long,
        env = CONDITIONAL_WRITES_ENV,
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub conditional_writes: bool,

    #[arg(long, env = S3_ENDPOINT_ENV)]
    pub s3_endpoint: Option<String>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Json
    )]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["shortlink-lambda", "--bucket", "links"]).unwrap();

        assert_eq!(cli.bucket, "links");
        assert_eq!(cli.key_prefix, "u");
        assert_eq!(cli.max_attempts, 1);
        assert!(cli.conditional_writes);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.cdn_prefix.is_none());
    }

    #[test]
    fn overrides() {
        let cli = CLI::try_parse_from([
            "shortlink-lambda",
            "--bucket",
            "links",
            "--max-attempts",
            "3",
            "--conditional-writes",
            "false",
            "--log-format",
            "text",
        ])
        .unwrap();

        assert_eq!(cli.max_attempts, 3);
        assert!(!cli.conditional_writes);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn max_attempts_is_bounded() {
        assert!(CLI::try_parse_from([
            "shortlink-lambda",
            "--bucket",
            "links",
            "--max-attempts",
            "0"
        ])
        .is_err());
    }
}
