//! Emails API endpoint

use super::query_pairs;
use crate::{
    client::Client,
    error::Result,
    request::{ApiPath, RequestOptions},
    types::{Email, EmailList, EmailStats, ListEmailsParams, SendEmailParams},
};
use serde::Deserialize;

/// Emails API resource.
#[derive(Clone)]
pub struct Emails {
    client: Client,
}

impl Emails {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Sends an email.
    ///
    /// Pass an idempotency key in `options` to make retries of this call
    /// safe to deliver at most once.
    pub async fn send(&self, params: &SendEmailParams, options: &RequestOptions) -> Result<Email> {
        self.client
            .post("/emails", params, options)
            .await?
            .into_data()
    }

    /// Lists sent emails, newest first.
    pub async fn list(&self, params: &ListEmailsParams) -> Result<EmailList> {
        let query = query_pairs([
            ("status", params.status.map(|s| s.as_str().to_string())),
            ("page", params.page.map(|p| p.to_string())),
            ("limit", params.limit.map(|l| l.to_string())),
        ]);
        self.client.get("/emails", query).await?.into_data()
    }

    /// Retrieves an email by id.
    pub async fn get(&self, id: &str) -> Result<Email> {
        self.client
            .get(ApiPath::from("/emails").segment(id), Vec::new())
            .await?
            .into_data()
    }

    /// Returns account-wide sending statistics.
    pub async fn stats(&self) -> Result<EmailStats> {
        #[derive(Deserialize)]
        struct StatsWrapper {
            stats: EmailStats,
        }

        let wrapper: StatsWrapper = self
            .client
            .get("/emails/stats", Vec::new())
            .await?
            .into_data()?;
        Ok(wrapper.stats)
    }
}
