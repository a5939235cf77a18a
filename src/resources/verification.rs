//! Email verification API endpoint

use super::query_pairs;
use crate::{
    client::Client,
    error::Result,
    request::{ApiPath, RequestOptions},
    types::{
        BatchVerificationResult, ListVerificationsParams, VerificationResult, VerificationStats,
        VerificationsResponse, VerifyEmailParams,
    },
};
use serde::Serialize;

/// Email verification API resource.
#[derive(Clone)]
pub struct Verification {
    client: Client,
}

impl Verification {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Verifies a single address.
    pub async fn verify(&self, params: &VerifyEmailParams) -> Result<VerificationResult> {
        self.client
            .post("/email-verification/single", params, &RequestOptions::default())
            .await?
            .into_data()
    }

    /// Starts a batch verification.
    ///
    /// When every address is already cached the results come back
    /// immediately; otherwise poll [`Verification::get`] with the returned
    /// `verification_id`.
    pub async fn batch(&self, emails: &[String]) -> Result<BatchVerificationResult> {
        #[derive(Serialize)]
        struct BatchBody<'a> {
            emails: &'a [String],
        }

        self.client
            .post(
                "/email-verification/batch",
                &BatchBody { emails },
                &RequestOptions::default(),
            )
            .await?
            .into_data()
    }

    /// Retrieves a batch verification and its results.
    pub async fn get(&self, verification_id: &str) -> Result<BatchVerificationResult> {
        self.client
            .get(
                ApiPath::from("/email-verification").segment(verification_id),
                Vec::new(),
            )
            .await?
            .into_data()
    }

    /// Lists batch verifications.
    pub async fn list(&self, params: &ListVerificationsParams) -> Result<VerificationsResponse> {
        let query = query_pairs([
            ("page", params.page.map(|p| p.to_string())),
            ("limit", params.limit.map(|l| l.to_string())),
            ("status", params.status.clone()),
        ]);
        self.client
            .get("/email-verification", query)
            .await?
            .into_data()
    }

    /// Returns account-wide verification statistics.
    pub async fn stats(&self) -> Result<VerificationStats> {
        self.client
            .get("/email-verification/stats", Vec::new())
            .await?
            .into_data()
    }
}
