//! API resource endpoints.
//!
//! Each resource is a thin handle over a [`Client`](crate::Client) clone and
//! maps its operations onto calls to the transport.

pub mod attachments;
pub mod automations;
pub mod contacts;
pub mod emails;
pub mod lists;
pub mod verification;

pub use attachments::Attachments;
pub use automations::{Automations, Enrollments};
pub use contacts::Contacts;
pub use emails::Emails;
pub use lists::Lists;
pub use verification::Verification;

/// Collects the set query parameters, in order.
pub(crate) fn query_pairs<const N: usize>(
    pairs: [(&str, Option<String>); N],
) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
}
