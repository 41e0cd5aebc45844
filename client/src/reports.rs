//! Report endpoints under `/reports`.

use async_trait::async_trait;

use taroudant_domain::api::ReportApi;
use taroudant_domain::error::Result;
use taroudant_domain::types::{Report, ReportDraft, ReportId, ReportStatus};

use crate::ApiClient;

#[async_trait]
impl ReportApi for ApiClient {
    async fn submit(&self, draft: ReportDraft) -> Result<Report> {
        self.post_json("/reports", &draft).await
    }

    async fn list_all(&self) -> Result<Vec<Report>> {
        self.get_json("/reports").await
    }

    async fn set_status(&self, id: ReportId, status: ReportStatus) -> Result<Report> {
        self.put_empty(&format!("/reports/{id}/status?status={}", status.as_str()))
            .await
    }
}
