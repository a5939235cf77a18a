//! Contact lists API endpoint

use super::query_pairs;
use crate::{
    client::Client,
    error::Result,
    request::{ApiPath, RequestOptions},
    types::{CreateListParams, List, ListListsParams, ListStats, ListsResponse, PaginationMeta, UpdateListParams},
};
use serde::Deserialize;

/// Contact lists API resource.
#[derive(Clone)]
pub struct Lists {
    client: Client,
}

/// The server answers list queries either with a bare array or with a
/// paginated object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListsPayload {
    Bare(Vec<List>),
    Paginated(ListsResponse),
}

impl From<ListsPayload> for ListsResponse {
    fn from(payload: ListsPayload) -> Self {
        match payload {
            ListsPayload::Paginated(page) => page,
            ListsPayload::Bare(data) => {
                let total = data.len() as u32;
                ListsResponse {
                    pagination: PaginationMeta {
                        page: 1,
                        limit: total,
                        total: u64::from(total),
                        total_pages: 1,
                        has_next: false,
                        has_prev: false,
                    },
                    data,
                }
            }
        }
    }
}

fn list_path(id: &str) -> ApiPath {
    ApiPath::from("/contact-lists").segment(id)
}

impl Lists {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a list.
    pub async fn create(&self, params: &CreateListParams) -> Result<List> {
        self.client
            .post("/contact-lists", params, &RequestOptions::default())
            .await?
            .into_data()
    }

    /// Lists contact lists.
    pub async fn list(&self, params: &ListListsParams) -> Result<ListsResponse> {
        let query = query_pairs([
            ("page", params.page.map(|p| p.to_string())),
            ("limit", params.limit.map(|l| l.to_string())),
            ("search", params.search.clone()),
        ]);
        let payload: ListsPayload = self.client.get("/contact-lists", query).await?.into_data()?;
        Ok(payload.into())
    }

    /// Retrieves a list by id.
    pub async fn get(&self, id: &str) -> Result<List> {
        self.client
            .get(list_path(id), Vec::new())
            .await?
            .into_data()
    }

    /// Updates a list.
    pub async fn update(&self, id: &str, params: &UpdateListParams) -> Result<List> {
        self.client
            .put(list_path(id), params)
            .await?
            .into_data()
    }

    /// Deletes a list.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(list_path(id))
            .await?;
        Ok(())
    }

    /// Returns contact counts for a list.
    pub async fn stats(&self, id: &str) -> Result<ListStats> {
        self.client
            .get(list_path(id).segment("stats"), Vec::new())
            .await?
            .into_data()
    }
}
