use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const S3_PORT: u16 = 9000;

#[derive(Debug, Clone, TypedBuilder)]
pub struct MinioConfig {
    #[builder(default = "shortlink".to_string())]
    access_key: String,
    #[builder(default = "shortlink-secret".to_string())]
    secret_key: String,
    #[builder(default = "us-east-1".to_string())]
    region: String,
}

/// Test fixture for a disposable MinIO server speaking the S3 API.
pub struct MinioServer {
    container: ContainerAsync<GenericImage>,
    config: MinioConfig,
}

impl MinioServer {
    /// Starts a MinIO container suitable for integration tests.
    pub async fn new(config: MinioConfig) -> Result<Self> {
        let container = GenericImage::new("minio/minio", "latest")
            .with_exposed_port(S3_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("API:"))
            .with_env_var("MINIO_ROOT_USER", config.access_key.as_str())
            .with_env_var("MINIO_ROOT_PASSWORD", config.secret_key.as_str())
            .with_env_var("MINIO_REGION", config.region.as_str())
            .with_cmd(["server", "/data"])
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(S3_PORT).await?)
    }

    /// Returns the `http://host:port` endpoint of the S3 API.
    pub async fn endpoint_url(&self) -> Result<String> {
        let host = self.host().await?;
        let port = self.port().await?;
        Ok(format!("http://{}:{}", host, port))
    }

    pub fn access_key(&self) -> &str {
        &self.config.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.config.secret_key
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }
}
