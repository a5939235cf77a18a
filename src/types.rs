//! Request and response models for the MailBreeze resources.
//!
//! Field names follow the API's camelCase wire format unless noted.
//! Timestamps are RFC 3339 and decode into `chrono::DateTime<Utc>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Pagination block of list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(alias = "total_pages")]
    pub total_pages: u32,
    #[serde(alias = "has_next")]
    pub has_next: bool,
    #[serde(alias = "has_prev")]
    pub has_prev: bool,
}

// ---------------------------------------------------------------------------
// Emails
// ---------------------------------------------------------------------------

/// Delivery status of an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Pending,
    Queued,
    Sent,
    Delivered,
    Bounced,
    Complained,
    Failed,
    /// A status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl EmailStatus {
    /// The wire representation, used for query filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Pending => "pending",
            EmailStatus::Queued => "queued",
            EmailStatus::Sent => "sent",
            EmailStatus::Delivered => "delivered",
            EmailStatus::Bounced => "bounced",
            EmailStatus::Complained => "complained",
            EmailStatus::Failed => "failed",
            EmailStatus::Unknown => "unknown",
        }
    }
}

/// An email known to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub status: EmailStatus,
    #[serde(default, alias = "message_id")]
    pub message_id: Option<String>,
    #[serde(default, alias = "template_id")]
    pub template_id: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "sent_at")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "delivered_at")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "opened_at")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "clicked_at")]
    pub clicked_at: Option<DateTime<Utc>>,
}

/// Parameters for sending an email.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailParams {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Filters for listing emails.
#[derive(Debug, Clone, Default)]
pub struct ListEmailsParams {
    pub status: Option<EmailStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A page of emails.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailList {
    pub data: Vec<Email>,
    pub pagination: PaginationMeta,
}

/// Account-wide email statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailStats {
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
    pub transactional: u64,
    pub marketing: u64,
    pub success_rate: f64,
}

// ---------------------------------------------------------------------------
// Contact lists
// ---------------------------------------------------------------------------

/// A contact list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parameters for creating a list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateListParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameters for updating a list. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Filters for listing lists.
#[derive(Debug, Clone, Default)]
pub struct ListListsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

/// A page of contact lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListsResponse {
    pub data: Vec<List>,
    pub pagination: PaginationMeta,
}

/// Per-list contact counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListStats {
    pub total_contacts: u64,
    pub active_contacts: u64,
    pub unsubscribed_contacts: u64,
    pub bounced_contacts: u64,
    pub complained_contacts: u64,
    pub suppressed_contacts: u64,
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// Subscription status of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Active,
    Unsubscribed,
    Bounced,
    Complained,
    Suppressed,
    #[serde(other)]
    Unknown,
}

impl ContactStatus {
    /// The wire representation, used for query filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Active => "active",
            ContactStatus::Unsubscribed => "unsubscribed",
            ContactStatus::Bounced => "bounced",
            ContactStatus::Complained => "complained",
            ContactStatus::Suppressed => "suppressed",
            ContactStatus::Unknown => "unknown",
        }
    }
}

/// Legal basis for contacting someone (NDPR consent tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentType {
    Explicit,
    Implicit,
    LegitimateInterest,
}

/// Why a contact is being suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    Manual,
    Unsubscribed,
    Bounced,
    Complained,
    SpamTrap,
}

/// A contact in a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub status: ContactStatus,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subscribed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unsubscribed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub consent_type: Option<ConsentType>,
    #[serde(default)]
    pub consent_source: Option<String>,
    #[serde(default)]
    pub consent_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub consent_ip_address: Option<String>,
}

/// Parameters for creating a contact.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactParams {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub custom_fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_type: Option<ConsentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_ip_address: Option<String>,
}

/// Parameters for updating a contact. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub custom_fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_type: Option<ConsentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_ip_address: Option<String>,
}

/// Filters for listing contacts.
#[derive(Debug, Clone, Default)]
pub struct ListContactsParams {
    pub status: Option<ContactStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

/// A page of contacts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactList {
    pub data: Vec<Contact>,
    pub pagination: PaginationMeta,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Outcome class of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Risky,
    #[serde(other)]
    Unknown,
}

/// Signals gathered while verifying an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationDetails {
    pub is_free_provider: bool,
    pub is_disposable: bool,
    pub is_role_account: bool,
    pub has_mx_records: bool,
    pub is_spam_trap: bool,
}

/// Result of verifying one address.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub email: String,
    #[serde(default)]
    pub is_valid: bool,
    pub result: VerificationStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub risk_score: u32,
    #[serde(default)]
    pub details: Option<VerificationDetails>,
}

/// Parameters for verifying one address.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailParams {
    pub email: String,
}

/// Per-class counts of a batch verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchVerificationAnalytics {
    pub valid: u64,
    pub invalid: u64,
    pub risky: u64,
    pub unknown: u64,
}

/// Batch results grouped by outcome, returned when every address was cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchResults {
    pub clean: Vec<String>,
    pub dirty: Vec<String>,
    pub unknown: Vec<String>,
}

/// The two shapes the `results` field of a batch can take.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchVerificationResults {
    /// One result per address.
    Detailed(Vec<VerificationResult>),
    /// Addresses grouped by outcome.
    Grouped(BatchResults),
}

impl<'de> Deserialize<'de> for BatchVerificationResults {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Try the narrower list shape first, then the grouped object.
        let value = Value::deserialize(deserializer)?;
        if value.is_array() {
            return serde_json::from_value(value)
                .map(BatchVerificationResults::Detailed)
                .map_err(serde::de::Error::custom);
        }
        serde_json::from_value(value)
            .map(BatchVerificationResults::Grouped)
            .map_err(serde::de::Error::custom)
    }
}

/// A batch verification job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVerificationResult {
    pub verification_id: String,
    pub status: String,
    #[serde(default)]
    pub total_emails: u64,
    #[serde(default)]
    pub processed_emails: u64,
    #[serde(default)]
    pub credits_deducted: u64,
    #[serde(default)]
    pub results: Option<BatchVerificationResults>,
    #[serde(default)]
    pub analytics: Option<BatchVerificationAnalytics>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Filters for listing batch verifications.
#[derive(Debug, Clone, Default)]
pub struct ListVerificationsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// A page of batch verifications.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerificationsResponse {
    pub data: Vec<BatchVerificationResult>,
    pub pagination: PaginationMeta,
}

/// Account-wide verification statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationStats {
    pub total_verified: u64,
    pub total_valid: u64,
    pub total_invalid: u64,
    pub total_unknown: u64,
    pub total_verifications: u64,
    pub valid_percentage: f64,
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// Parameters for requesting a pre-signed upload URL.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadParams {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

/// A pre-signed upload target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    pub attachment_id: String,
    pub upload_url: String,
    pub upload_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A confirmed attachment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Automations (snake_case on the wire)
// ---------------------------------------------------------------------------

/// State of a contact's enrollment in an automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Cancelled,
    Failed,
    #[serde(other)]
    Unknown,
}

impl EnrollmentStatus {
    /// The wire representation, used for query filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Cancelled => "cancelled",
            EnrollmentStatus::Failed => "failed",
            EnrollmentStatus::Unknown => "unknown",
        }
    }
}

/// Parameters for enrolling a contact in an automation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrollParams {
    pub automation_id: String,
    pub contact_id: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

/// A contact's enrollment in an automation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub automation_id: String,
    pub contact_id: String,
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub current_step: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for listing enrollments.
#[derive(Debug, Clone, Default)]
pub struct ListEnrollmentsParams {
    pub automation_id: Option<String>,
    pub status: Option<EnrollmentStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A page of enrollments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrollmentList {
    pub items: Vec<Enrollment>,
    pub meta: PaginationMeta,
}

/// Result of cancelling an enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CancelEnrollmentResult {
    pub id: String,
    pub cancelled: bool,
}
