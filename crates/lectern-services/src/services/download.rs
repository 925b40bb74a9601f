use super::pdf_not_found;
use lectern_core::models::DownloadLinkResponse;
use lectern_core::AppError;
use lectern_db::CatalogStore;
use lectern_storage::LinkIssuer;
use std::sync::Arc;

/// Issues signed download links for stored documents. Read only.
#[derive(Clone)]
pub struct DownloadService {
    catalog: Arc<dyn CatalogStore>,
    links: LinkIssuer,
}

impl DownloadService {
    pub fn new(catalog: Arc<dyn CatalogStore>, links: LinkIssuer) -> Self {
        Self { catalog, links }
    }

    #[tracing::instrument(skip(self))]
    pub async fn download_link(
        &self,
        lesson_id: i64,
        document_id: i64,
    ) -> Result<DownloadLinkResponse, AppError> {
        let document = self
            .catalog
            .get_document(lesson_id, document_id)
            .await?
            .ok_or_else(pdf_not_found)?;

        let link = self
            .links
            .issue_download_link(&document.storage_address)
            .await?;

        Ok(DownloadLinkResponse {
            url: link.url,
            expires_in_seconds: link.expires_in_seconds,
        })
    }
}
