use crate::domain::model::{PatchOutcome, PatchReport, SourceDocument};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target_path(&self) -> &str;
    fn dry_run(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceDocument>;
    async fn transform(&self, document: SourceDocument) -> Result<PatchOutcome>;
    async fn load(&self, outcome: PatchOutcome) -> Result<PatchReport>;

    fn name(&self) -> &str;

    /// 停用的步驟在序列中會被略過
    fn is_enabled(&self) -> bool {
        true
    }
}
