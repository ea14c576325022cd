//! Client library tests, exercised against a recording in-memory
//! transport: submission short-circuiting, the confirm-dialog workflow,
//! report viewing/export, session expiry, and rate-limit retries.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};

use rams::client::{
    ApiClient, ApiRequest, ApiResponse, ApprovalAction, ClientError, Dialog, FileAttachment,
    ListState, Method, PartValue, PendingApprovals, ReportView, RequestBody, RetryPolicy, Session,
    SubmissionForm, Transport,
};
use rams::client::transport::TransportError;
use rams::models::registry::RecordType;
use rams::reports::ReportQuery;

/// Records every request and replays a scripted queue of responses.
/// An exhausted queue answers with an empty 200 array.
struct FakeTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl FakeTransport {
    fn new(responses: Vec<ApiResponse>) -> Self {
        FakeTransport {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ApiRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

impl Transport for &FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::ok_json(json!([]))))
    }
}

/// A transport whose wire is down.
struct DeadTransport;

impl Transport for DeadTransport {
    fn send(&self, _request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        Err(TransportError("connection refused".to_string()))
    }
}

fn client(transport: &FakeTransport) -> ApiClient<&FakeTransport> {
    ApiClient::new(transport, Session::with_token("test-token"))
        .with_retry(RetryPolicy::fixed(2, Duration::ZERO))
}

fn valid_awards_form() -> SubmissionForm {
    let mut form = SubmissionForm::new(RecordType::Awards);
    form.set_field("award", "Best Paper Award");
    form.set_field("type1", "National");
    form.set_field("type2", "Gold");
    form.set_field("agency", "AICTE");
    form.set_field("date2", "2024-03-15");
    form.attach(FileAttachment {
        filename: "certificate.pdf".to_string(),
        mime: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    });
    form
}

// --- submission form ---

#[test]
fn invalid_form_never_reaches_the_transport() {
    let transport = FakeTransport::new(vec![]);
    let api = client(&transport);

    let mut form = SubmissionForm::new(RecordType::Awards);
    form.set_field("award", "Best Paper");
    // type1, type2, agency, date2, file all missing

    let result = form.submit(&api);
    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert_eq!(transport.request_count(), 0);
    assert!(form.errors().contains_key("agency"));
    assert!(form.errors().contains_key("file"));
}

#[test]
fn successful_submit_posts_multipart_and_resets() {
    let transport = FakeTransport::new(vec![ApiResponse::ok_json(json!({
        "id": 1, "status": "Pending"
    }))]);
    let api = client(&transport);

    let mut form = valid_awards_form();
    let created = form.submit(&api).expect("Submission failed");
    assert_eq!(created["status"], "Pending");

    assert_eq!(transport.request_count(), 1);
    let request = transport.request(0);
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "/awards");
    assert_eq!(request.bearer.as_deref(), Some("test-token"));

    let RequestBody::Multipart(parts) = request.body else {
        panic!("Expected a multipart body");
    };
    let last = parts.last().expect("No parts");
    assert_eq!(last.name, "file");
    assert!(matches!(&last.value, PartValue::File { mime, .. } if mime == "application/pdf"));

    assert!(form.is_pristine());
}

#[test]
fn failed_submit_keeps_entered_values() {
    let transport = FakeTransport::new(vec![ApiResponse::error(500, "database unavailable")]);
    let api = client(&transport);

    let mut form = valid_awards_form();
    let result = form.submit(&api);
    assert!(matches!(
        result,
        Err(ClientError::Request { status: 500, ref message }) if message == "database unavailable"
    ));
    assert_eq!(form.field("award"), "Best Paper Award");
    assert!(form.file().is_some());
}

// --- approval workflow ---

fn pending_row(id: i64) -> Value {
    json!({ "id": id, "empId": "E1", "employee": "Asha", "status": "Pending" })
}

#[test]
fn confirm_sends_one_put_then_refreshes() {
    let transport = FakeTransport::new(vec![
        ApiResponse::ok_json(json!([pending_row(7)])),
        ApiResponse::ok_json(json!({ "id": 7, "status": "Accepted" })),
        ApiResponse::ok_json(json!([])),
    ]);
    let api = client(&transport);

    let mut approvals = PendingApprovals::new(RecordType::Awards);
    approvals.refresh(&api).expect("Refresh failed");
    assert_eq!(approvals.rows().len(), 1);

    assert!(approvals.request(pending_row(7), ApprovalAction::Accept));
    approvals.confirm(&api, None).expect("Confirm failed");

    assert_eq!(transport.request_count(), 3);
    let put = transport.request(1);
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.path, "/awards/7/status");
    let RequestBody::Json(body) = put.body else {
        panic!("Expected a JSON body");
    };
    assert_eq!(body["status"], "Accepted");

    assert_eq!(approvals.dialog(), &Dialog::Closed);
    assert!(approvals.rows().is_empty());
}

#[test]
fn reject_confirmation_carries_the_reason() {
    let transport = FakeTransport::new(vec![
        ApiResponse::ok_json(json!({ "id": 7, "status": "Rejected" })),
        ApiResponse::ok_json(json!([])),
    ]);
    let api = client(&transport);

    let mut approvals = PendingApprovals::new(RecordType::Awards);
    approvals.request(pending_row(7), ApprovalAction::Reject);
    approvals.confirm(&api, Some("duplicate submission")).expect("Confirm failed");

    let RequestBody::Json(body) = transport.request(0).body else {
        panic!("Expected a JSON body");
    };
    assert_eq!(body["status"], "Rejected");
    assert_eq!(body["reason"], "duplicate submission");
}

#[test]
fn cancel_touches_nothing() {
    let transport = FakeTransport::new(vec![ApiResponse::ok_json(json!([pending_row(7)]))]);
    let api = client(&transport);

    let mut approvals = PendingApprovals::new(RecordType::Awards);
    approvals.refresh(&api).expect("Refresh failed");
    let before = approvals.rows().to_vec();

    approvals.request(pending_row(7), ApprovalAction::Accept);
    approvals.cancel();

    assert_eq!(transport.request_count(), 1); // only the initial refresh
    assert_eq!(approvals.dialog(), &Dialog::Closed);
    assert_eq!(approvals.rows(), before.as_slice());
}

#[test]
fn dialog_is_modal_while_a_confirmation_is_open() {
    let mut approvals = PendingApprovals::new(RecordType::Awards);
    assert!(approvals.request(pending_row(1), ApprovalAction::Accept));
    assert!(!approvals.request(pending_row(2), ApprovalAction::Reject));

    let Dialog::Confirming { record, action } = approvals.dialog() else {
        panic!("Dialog should be open");
    };
    assert_eq!(record["id"], 1);
    assert_eq!(*action, ApprovalAction::Accept);
}

#[test]
fn failed_confirm_leaves_the_list_untouched() {
    let transport = FakeTransport::new(vec![
        ApiResponse::ok_json(json!([pending_row(7)])),
        ApiResponse::error(409, "Record already Accepted"),
    ]);
    let api = client(&transport);

    let mut approvals = PendingApprovals::new(RecordType::Awards);
    approvals.refresh(&api).expect("Refresh failed");

    approvals.request(pending_row(7), ApprovalAction::Accept);
    let result = approvals.confirm(&api, None);
    assert!(matches!(result, Err(ClientError::Request { status: 409, .. })));

    assert_eq!(transport.request_count(), 2); // refresh + the failed PUT, no refetch
    assert_eq!(approvals.rows().len(), 1);
    assert_eq!(approvals.dialog(), &Dialog::Closed);
}

#[test]
fn network_failure_marks_the_list_failed() {
    let api = ApiClient::new(DeadTransport, Session::with_token("t"));

    let mut approvals = PendingApprovals::new(RecordType::Awards);
    let result = approvals.refresh(&api);
    assert!(matches!(result, Err(ClientError::Network(_))));
    assert!(matches!(approvals.state(), ListState::Failed(_)));
    assert!(approvals.rows().is_empty());
}

// --- report view ---

#[test]
fn report_view_applies_filters_locally() {
    let transport = FakeTransport::new(vec![ApiResponse::ok_json(json!([
        { "empId": "E1", "employee": "Asha", "status": "Accepted" },
        { "empId": "E2", "employee": "Ben", "status": "Pending" },
    ]))]);
    let api = client(&transport);

    let mut view = ReportView::new(ReportQuery::new(RecordType::Awards));
    view.load(&api).expect("Load failed");
    assert_eq!(view.visible_rows().len(), 2);

    let mut filter = rams::reports::filter::ViewFilter::default();
    filter.employee = Some("ben".to_string());
    view.set_filter(filter);

    assert_eq!(view.visible_rows().len(), 1);
    assert_eq!(transport.request_count(), 1); // filtering never refetches
}

#[test]
fn summary_envelope_is_unwrapped() {
    let transport = FakeTransport::new(vec![ApiResponse::ok_json(json!({
        "data": [{ "empId": "E1", "total": 3 }],
        "department": "CSE",
        "year": "2023-24",
        "facultyCount": 1,
    }))]);
    let api = client(&transport);

    let mut view = ReportView::new(ReportQuery::new(RecordType::Summary));
    view.load(&api).expect("Load failed");
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0]["total"], 3);
}

#[test]
fn export_reuses_the_loaded_query() {
    let transport = FakeTransport::new(vec![
        ApiResponse::ok_json(json!([])),
        ApiResponse { status: 200, body: b"PK\x03\x04fake".to_vec() },
    ]);
    let api = client(&transport);

    let query = ReportQuery::new(RecordType::Awards).with_year(Some("2023-24".to_string()));
    let mut view = ReportView::new(query);
    view.load(&api).expect("Load failed");

    let (filename, bytes) = view.export(&api).expect("Export failed");
    assert_eq!(filename, "awards_2023-24_report.xlsx");
    assert_eq!(&bytes[..2], b"PK");

    let export_request = transport.request(1);
    let view_params = transport.request(0).query;
    let mut expected = view_params.clone();
    expected.push(("format".to_string(), "excel".to_string()));
    assert_eq!(export_request.query, expected);
}

// --- session and retry behavior ---

#[test]
fn unauthorized_response_expires_the_session_once() {
    let transport = FakeTransport::new(vec![
        ApiResponse::error(401, "Invalid token"),
        ApiResponse::error(401, "Invalid token"),
    ]);
    let session = Session::with_token("stale");
    let fired = std::sync::Arc::new(AtomicUsize::new(0));
    let observer = fired.clone();
    session.on_expired(move || {
        observer.fetch_add(1, Ordering::SeqCst);
    });

    let api = ApiClient::new(&transport, session.clone());
    assert!(matches!(api.get("/dashboard/stats", vec![]), Err(ClientError::Auth)));
    assert!(matches!(api.get("/dashboard/stats", vec![]), Err(ClientError::Auth)));

    assert!(!session.is_authenticated());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn rate_limited_request_is_retried_then_succeeds() {
    let transport = FakeTransport::new(vec![
        ApiResponse::error(429, "Too many requests"),
        ApiResponse::ok_json(json!([])),
    ]);
    let api = client(&transport); // 2 attempts, zero delay

    let response = api.get("/reports/academic-years", vec![]).expect("Request failed");
    assert!(response.is_success());
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn retries_exhausted_surface_rate_limited() {
    let transport = FakeTransport::new(vec![
        ApiResponse::error(429, "Too many requests"),
        ApiResponse::error(429, "Too many requests"),
    ]);
    let api = client(&transport);

    let result = api.get("/reports/academic-years", vec![]);
    assert!(matches!(result, Err(ClientError::RateLimited)));
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn no_retry_policy_fails_on_first_429() {
    let transport = FakeTransport::new(vec![ApiResponse::error(429, "Too many requests")]);
    let api = ApiClient::new(&transport, Session::with_token("t")).with_retry(RetryPolicy::none());

    assert!(matches!(
        api.get("/reports/academic-years", vec![]),
        Err(ClientError::RateLimited)
    ));
    assert_eq!(transport.request_count(), 1);
}
