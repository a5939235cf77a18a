//! Automations API endpoint

use super::query_pairs;
use crate::{
    client::Client,
    error::Result,
    request::{ApiPath, Endpoint, RequestOptions},
    types::{CancelEnrollmentResult, EnrollParams, Enrollment, EnrollmentList, ListEnrollmentsParams},
};
use http::Method;

/// Automations API resource.
#[derive(Clone)]
pub struct Automations {
    client: Client,
}

impl Automations {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Enrolls a contact in an automation.
    pub async fn enroll(&self, params: &EnrollParams, options: &RequestOptions) -> Result<Enrollment> {
        self.client
            .post("/automations/enroll", params, options)
            .await?
            .into_data()
    }

    /// Access the enrollments sub-resource.
    pub fn enrollments(&self) -> Enrollments {
        Enrollments {
            client: self.client.clone(),
        }
    }
}

/// Enrollments sub-resource of [`Automations`].
#[derive(Clone)]
pub struct Enrollments {
    client: Client,
}

impl Enrollments {
    /// Lists enrollments.
    pub async fn list(&self, params: &ListEnrollmentsParams) -> Result<EnrollmentList> {
        let query = query_pairs([
            ("automation_id", params.automation_id.clone()),
            ("status", params.status.map(|s| s.as_str().to_string())),
            ("page", params.page.map(|p| p.to_string())),
            ("limit", params.limit.map(|l| l.to_string())),
        ]);
        self.client
            .get("/automations/enrollments", query)
            .await?
            .into_data()
    }

    /// Cancels an enrollment.
    pub async fn cancel(&self, enrollment_id: &str) -> Result<CancelEnrollmentResult> {
        let endpoint = Endpoint::new(
            Method::POST,
            ApiPath::from("/automations/enrollments")
                .segment(enrollment_id)
                .segment("cancel"),
        );
        self.client
            .call::<(), _>(endpoint, None, &RequestOptions::default())
            .await?
            .into_data()
    }
}
