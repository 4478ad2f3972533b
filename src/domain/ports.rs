use crate::domain::model::SuggestedItem;
use crate::utils::error::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use std::time::Duration;

/// Destination for exported files.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn ai_endpoint(&self) -> &str;
    fn ai_model(&self) -> &str;
    fn api_key(&self) -> Option<&SecretString>;
    fn request_timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn export_filename(&self) -> &str;
}

/// External generative service proposing BOM items from a project description.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, description: &str) -> Result<Vec<SuggestedItem>>;
}
