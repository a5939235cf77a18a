//! Attachments API endpoint
//!
//! Uploads are two-step: request a pre-signed URL, PUT the file bytes to
//! it, then confirm the attachment so it can be referenced when sending.

use crate::{
    client::Client,
    error::Result,
    request::RequestOptions,
    types::{Attachment, CreateUploadParams, UploadUrl},
};
use serde::Serialize;

/// Attachments API resource.
#[derive(Clone)]
pub struct Attachments {
    client: Client,
}

impl Attachments {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Requests a pre-signed upload URL for a new attachment.
    pub async fn create_upload(&self, params: &CreateUploadParams) -> Result<UploadUrl> {
        self.client
            .post("/attachments/upload", params, &RequestOptions::default())
            .await?
            .into_data()
    }

    /// Confirms that the file was uploaded.
    pub async fn confirm(&self, attachment_id: &str) -> Result<Attachment> {
        #[derive(Serialize)]
        struct ConfirmBody<'a> {
            attachment_id: &'a str,
        }

        self.client
            .post(
                "/attachments/confirm",
                &ConfirmBody { attachment_id },
                &RequestOptions::default(),
            )
            .await?
            .into_data()
    }
}
