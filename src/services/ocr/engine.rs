use crate::error::EngineError;
use crate::models::recognition::{ProgressEvent, RecognitionOutput};
use async_trait::async_trait;
use std::sync::Arc;

/// Observer for engine progress events
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Recognition engine - abstraction over the external OCR collaborator
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Engine identifier used in logs
    fn name(&self) -> &str;

    /// Recognize text in an image given as a base64 `data:` URI.
    ///
    /// `progress` may be called any number of times before the future resolves.
    async fn recognize(
        &self,
        image: &str,
        language: &str,
        progress: ProgressSink,
    ) -> Result<RecognitionOutput, EngineError>;
}
