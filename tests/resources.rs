//! Resource wrapper tests: paths, bodies and response shapes.

use mailbreeze::types::{
    BatchVerificationResults, ContactStatus, CreateContactParams, CreateListParams,
    CreateUploadParams, EmailStatus, EnrollParams, EnrollmentStatus, ListContactsParams,
    ListEmailsParams, ListEnrollmentsParams, ListListsParams, SendEmailParams, SuppressReason,
    UpdateListParams, VerificationStatus, VerifyEmailParams,
};
use mailbreeze::{Client, Error, RequestOptions, RetryPolicy};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::builder()
        .api_key("sk_test_123")
        .base_url(server.uri())
        .unwrap()
        .retry_policy(RetryPolicy::none())
        .build()
        .unwrap()
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

#[tokio::test]
async fn test_emails_send() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("x-idempotency-key", "welcome-42"))
        .and(body_json(json!({
            "from": "hello@example.com",
            "to": ["user@example.com"],
            "subject": "Welcome",
            "html": "<h1>Hi</h1>"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": "email_123",
                "from": "hello@example.com",
                "to": ["user@example.com"],
                "subject": "Welcome",
                "status": "queued",
                "createdAt": "2024-01-01T00:00:00Z"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = SendEmailParams {
        from: "hello@example.com".to_string(),
        to: vec!["user@example.com".to_string()],
        subject: Some("Welcome".to_string()),
        html: Some("<h1>Hi</h1>".to_string()),
        ..Default::default()
    };
    let options = RequestOptions::new().idempotency_key("welcome-42");
    let email = client(&mock_server)
        .emails()
        .send(&params, &options)
        .await
        .unwrap();

    assert_eq!(email.id, "email_123");
    assert_eq!(email.status, EmailStatus::Queued);
    assert!(email.created_at.is_some());
}

#[tokio::test]
async fn test_emails_list_and_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emails"))
        .and(query_param("status", "delivered"))
        .and(query_param("limit", "10"))
        .respond_with(ok(json!({
            "data": [{"id": "email_1", "status": "delivered"}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1, "hasNext": false, "hasPrev": false}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/emails/email%2F1"))
        .respond_with(ok(json!({"id": "email/1", "status": "sent"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let emails = client(&mock_server).emails();
    let page = emails
        .list(&ListEmailsParams {
            status: Some(EmailStatus::Delivered),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.total, 1);

    let email = emails.get("email/1").await.unwrap();
    assert_eq!(email.status, EmailStatus::Sent);
}

#[tokio::test]
async fn test_emails_stats_unwraps_stats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emails/stats"))
        .respond_with(ok(json!({
            "stats": {"total": 100, "sent": 95, "failed": 5, "transactional": 60, "marketing": 40, "successRate": 95.0}
        })))
        .mount(&mock_server)
        .await;

    let stats = client(&mock_server).emails().stats().await.unwrap();
    assert_eq!(stats.total, 100);
    assert_eq!(stats.failed, 5);
    assert_eq!(stats.success_rate, 95.0);
}

#[tokio::test]
async fn test_lists_crud() {
    let mock_server = MockServer::start().await;
    let list = json!({"id": "list_1", "name": "Newsletter", "contactCount": 3});

    Mock::given(method("POST"))
        .and(path("/contact-lists"))
        .and(body_json(json!({"name": "Newsletter"})))
        .respond_with(ok(list.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/contact-lists/list_1"))
        .and(body_json(json!({"description": "Weekly"})))
        .respond_with(ok(list.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/contact-lists/list_1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact-lists/list_1/stats"))
        .respond_with(ok(json!({"totalContacts": 3, "activeContacts": 2, "suppressedContacts": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let lists = client(&mock_server).lists();
    let created = lists
        .create(&CreateListParams {
            name: "Newsletter".to_string(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(created.contact_count, 3);

    lists
        .update(
            "list_1",
            &UpdateListParams {
                description: Some("Weekly".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    lists.delete("list_1").await.unwrap();

    let stats = lists.stats("list_1").await.unwrap();
    assert_eq!(stats.total_contacts, 3);
    assert_eq!(stats.suppressed_contacts, 1);
}

#[tokio::test]
async fn test_lists_list_accepts_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contact-lists"))
        .respond_with(ok(json!([
            {"id": "list_1", "name": "A"},
            {"id": "list_2", "name": "B"},
            {"id": "list_3", "name": "C"}
        ])))
        .mount(&mock_server)
        .await;

    let page = client(&mock_server)
        .lists()
        .list(&ListListsParams::default())
        .await
        .unwrap();

    assert_eq!(page.data.len(), 3);
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.limit, 3);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 1);
    assert!(!page.pagination.has_next);
}

#[tokio::test]
async fn test_lists_list_accepts_paginated_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contact-lists"))
        .and(query_param("page", "2"))
        .and(query_param("search", "vip"))
        .respond_with(ok(json!({
            "data": [{"id": "list_9", "name": "VIP"}],
            "pagination": {"page": 2, "limit": 1, "total": 4, "totalPages": 4, "hasNext": true, "hasPrev": true}
        })))
        .mount(&mock_server)
        .await;

    let page = client(&mock_server)
        .lists()
        .list(&ListListsParams {
            page: Some(2),
            search: Some("vip".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.data[0].name, "VIP");
    assert_eq!(page.pagination.total_pages, 4);
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn test_contacts_scoped_to_list() {
    let mock_server = MockServer::start().await;
    let contact = json!({"id": "contact_1", "email": "user@example.com", "status": "active"});

    Mock::given(method("POST"))
        .and(path("/contact-lists/list_1/contacts"))
        .and(body_json(json!({"email": "user@example.com", "firstName": "Ada"})))
        .respond_with(ok(contact.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact-lists/list_1/contacts"))
        .and(query_param("status", "active"))
        .respond_with(ok(json!({"data": [contact.clone()], "pagination": {"page": 1, "limit": 20, "total": 1}})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/contact-lists/list_1/contacts/contact_1"))
        .respond_with(ok(Value::Null))
        .expect(1)
        .mount(&mock_server)
        .await;

    let contacts = client(&mock_server).contacts("list_1");
    assert_eq!(contacts.list_id(), "list_1");

    let created = contacts
        .create(&CreateContactParams {
            email: "user@example.com".to_string(),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.status, ContactStatus::Active);

    let page = contacts
        .list(&ListContactsParams {
            status: Some(ContactStatus::Active),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);

    contacts.delete("contact_1").await.unwrap();
}

#[tokio::test]
async fn test_contacts_suppress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contact-lists/list_1/contacts/contact_1/suppress"))
        .and(body_json(json!({"reason": "spam_trap"})))
        .respond_with(ok(json!({"suppressed": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server)
        .contacts("list_1")
        .suppress("contact_1", SuppressReason::SpamTrap)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_contact_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contact-lists/list_1/contacts/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": {"code": "NOT_FOUND", "message": "Contact not found"}
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .contacts("list_1")
        .get("missing")
        .await
        .unwrap_err();
    match err {
        Error::Api(api) => {
            assert_eq!(api.status_code, 404);
            assert_eq!(api.message, "Contact not found");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_attachments_upload_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/attachments/upload"))
        .and(body_json(json!({"filename": "report.pdf", "contentType": "application/pdf", "size": 1024})))
        .respond_with(ok(json!({
            "attachmentId": "att_1",
            "uploadUrl": "https://uploads.example.com/att_1",
            "uploadToken": "tok",
            "expiresAt": "2024-01-01T01:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/attachments/confirm"))
        .and(body_json(json!({"attachment_id": "att_1"})))
        .respond_with(ok(json!({
            "id": "att_1",
            "filename": "report.pdf",
            "contentType": "application/pdf",
            "size": 1024,
            "status": "uploaded"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let attachments = client(&mock_server).attachments();
    let upload = attachments
        .create_upload(&CreateUploadParams {
            filename: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 1024,
            inline: false,
        })
        .await
        .unwrap();
    assert_eq!(upload.attachment_id, "att_1");

    let attachment = attachments.confirm(&upload.attachment_id).await.unwrap();
    assert_eq!(attachment.status, "uploaded");
}

#[tokio::test]
async fn test_verification_single_and_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email-verification/single"))
        .and(body_json(json!({"email": "user@example.com"})))
        .respond_with(ok(json!({
            "email": "user@example.com",
            "isValid": true,
            "result": "valid",
            "details": {"hasMxRecords": true}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/email-verification/batch"))
        .and(body_json(json!({"emails": ["a@example.com", "b@example"]})))
        .respond_with(ok(json!({
            "verificationId": "ver_1",
            "status": "completed",
            "totalEmails": 2,
            "results": {"clean": ["a@example.com"], "dirty": ["b@example"], "unknown": []}
        })))
        .mount(&mock_server)
        .await;

    let verification = client(&mock_server).verification();
    let single = verification
        .verify(&VerifyEmailParams {
            email: "user@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(single.result, VerificationStatus::Valid);
    assert!(single.details.unwrap().has_mx_records);

    let batch = verification
        .batch(&["a@example.com".to_string(), "b@example".to_string()])
        .await
        .unwrap();
    match batch.results {
        Some(BatchVerificationResults::Grouped(groups)) => {
            assert_eq!(groups.clean, vec!["a@example.com"]);
            assert_eq!(groups.dirty, vec!["b@example"]);
        }
        other => panic!("Expected grouped results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_verification_get_list_stats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/email-verification/ver_1"))
        .respond_with(ok(json!({
            "verificationId": "ver_1",
            "status": "completed",
            "results": [{"email": "a@example.com", "isValid": false, "result": "risky"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/email-verification/stats"))
        .respond_with(ok(json!({"totalVerified": 10, "totalValid": 8, "validPercentage": 80.0})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/email-verification"))
        .and(query_param("status", "completed"))
        .respond_with(ok(json!({"data": [], "pagination": {"page": 1, "limit": 20, "total": 0}})))
        .mount(&mock_server)
        .await;

    let verification = client(&mock_server).verification();

    let batch = verification.get("ver_1").await.unwrap();
    match batch.results {
        Some(BatchVerificationResults::Detailed(results)) => {
            assert_eq!(results[0].result, VerificationStatus::Risky);
        }
        other => panic!("Expected detailed results, got {:?}", other),
    }

    let stats = verification.stats().await.unwrap();
    assert_eq!(stats.total_valid, 8);

    let page = verification
        .list(&mailbreeze::types::ListVerificationsParams {
            status: Some("completed".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_automations_enroll_list_cancel() {
    let mock_server = MockServer::start().await;
    let enrollment = json!({
        "id": "enrollment_123",
        "automation_id": "automation_123",
        "contact_id": "contact_123",
        "status": "active",
        "current_step": 0,
        "created_at": "2024-01-01T00:00:00Z"
    });

    Mock::given(method("POST"))
        .and(path("/automations/enroll"))
        .and(body_json(json!({"automation_id": "automation_123", "contact_id": "contact_123"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true, "data": enrollment.clone()})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/automations/enrollments"))
        .and(query_param("automation_id", "automation_123"))
        .respond_with(ok(json!({
            "items": [enrollment.clone()],
            "meta": {"page": 1, "limit": 20, "total": 1, "total_pages": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/automations/enrollments/enrollment_123/cancel"))
        .respond_with(ok(json!({"id": "enrollment_123", "cancelled": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let automations = client(&mock_server).automations();
    let enrolled = automations
        .enroll(
            &EnrollParams {
                automation_id: "automation_123".to_string(),
                contact_id: "contact_123".to_string(),
                ..Default::default()
            },
            &RequestOptions::new(),
        )
        .await
        .unwrap();
    assert_eq!(enrolled.status, EnrollmentStatus::Active);

    let list = automations
        .enrollments()
        .list(&ListEnrollmentsParams {
            automation_id: Some("automation_123".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.meta.total, 1);
    assert_eq!(list.meta.total_pages, 1);

    let cancelled = automations
        .enrollments()
        .cancel("enrollment_123")
        .await
        .unwrap();
    assert!(cancelled.cancelled);

    let requests = mock_server.received_requests().await.unwrap();
    let cancel_request = requests
        .iter()
        .find(|r| r.url.path().ends_with("/cancel"))
        .unwrap();
    assert!(cancel_request.body.is_empty());
}

#[tokio::test]
async fn test_missing_payload_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emails/email_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).emails().get("email_1").await.unwrap_err();
    assert!(matches!(err, Error::MissingData { .. }), "got {:?}", err);
}
