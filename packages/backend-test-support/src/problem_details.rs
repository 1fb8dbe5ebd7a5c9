//! Assertions for `application/problem+json` error bodies.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the backend's error body, kept independent of backend types.
#[derive(Debug, Deserialize)]
pub struct ProblemBody {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

/// Parse a raw body and check status, code and (optionally) a detail substring.
pub fn assert_problem(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    detail_contains: Option<&str>,
) -> ProblemBody {
    assert_eq!(status, expected_status, "unexpected HTTP status");
    assert_eq!(
        content_type,
        Some("application/problem+json"),
        "error responses must be problem+json"
    );

    let problem: ProblemBody =
        serde_json::from_slice(body).expect("body should be problem-details JSON");
    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(expected_code),
        "type '{}' should end with the code",
        problem.type_
    );

    if let Some(needle) = detail_contains {
        assert!(
            problem.detail.contains(needle),
            "expected detail to contain '{needle}', got '{}'",
            problem.detail
        );
    }
    problem
}

/// Same as [`assert_problem`] for a response produced by `actix_web::test`.
pub async fn assert_problem_response(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    detail_contains: Option<&str>,
) -> ProblemBody {
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = actix_web::test::read_body(resp).await;
    assert_problem(
        status,
        content_type.as_deref(),
        &body,
        expected_code,
        expected_status,
        detail_contains,
    )
}
