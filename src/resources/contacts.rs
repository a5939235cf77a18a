//! Contacts API endpoint

use super::query_pairs;
use crate::{
    client::Client,
    error::Result,
    request::{ApiPath, RequestOptions},
    types::{Contact, ContactList, CreateContactParams, ListContactsParams, SuppressReason, UpdateContactParams},
};
use serde::{de::IgnoredAny, Serialize};

/// Contacts API resource, scoped to one contact list.
#[derive(Clone)]
pub struct Contacts {
    client: Client,
    list_id: String,
}

impl Contacts {
    pub(crate) fn new(client: Client, list_id: String) -> Self {
        Self { client, list_id }
    }

    /// Returns the id of the list this handle is scoped to.
    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    fn base_path(&self) -> ApiPath {
        ApiPath::from("/contact-lists")
            .segment(self.list_id.as_str())
            .segment("contacts")
    }

    fn contact_path(&self, contact_id: &str) -> ApiPath {
        self.base_path().segment(contact_id)
    }

    /// Adds a contact to the list.
    pub async fn create(&self, params: &CreateContactParams) -> Result<Contact> {
        self.client
            .post(self.base_path(), params, &RequestOptions::default())
            .await?
            .into_data()
    }

    /// Lists contacts in the list.
    pub async fn list(&self, params: &ListContactsParams) -> Result<ContactList> {
        let query = query_pairs([
            ("status", params.status.map(|s| s.as_str().to_string())),
            ("page", params.page.map(|p| p.to_string())),
            ("limit", params.limit.map(|l| l.to_string())),
            ("search", params.search.clone()),
        ]);
        self.client.get(self.base_path(), query).await?.into_data()
    }

    /// Retrieves a contact by id.
    pub async fn get(&self, contact_id: &str) -> Result<Contact> {
        self.client
            .get(self.contact_path(contact_id), Vec::new())
            .await?
            .into_data()
    }

    /// Updates a contact.
    pub async fn update(&self, contact_id: &str, params: &UpdateContactParams) -> Result<Contact> {
        self.client
            .put(self.contact_path(contact_id), params)
            .await?
            .into_data()
    }

    /// Removes a contact from the list.
    pub async fn delete(&self, contact_id: &str) -> Result<()> {
        self.client.delete(self.contact_path(contact_id)).await?;
        Ok(())
    }

    /// Adds a contact to the suppression list.
    pub async fn suppress(&self, contact_id: &str, reason: SuppressReason) -> Result<()> {
        #[derive(Serialize)]
        struct SuppressBody {
            reason: SuppressReason,
        }

        self.client
            .post::<_, IgnoredAny>(
                self.contact_path(contact_id).segment("suppress"),
                &SuppressBody { reason },
                &RequestOptions::default(),
            )
            .await?;
        Ok(())
    }
}
