//! JSON body extractor with `validator` rules applied
//!
//! A body that fails to parse, or parses but breaks a `#[validate]` rule,
//! is answered with 400 and the usual error envelope. Rule violations are
//! listed as `field: message`, sorted by field name.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::{bad_request, ApiError};

/// `Json<T>` that only yields values passing `T::validate()`.
///
/// ```ignore
/// async fn reject(ValidatedJson(body): ValidatedJson<RejectTripRequestRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| bad_request(format!("Invalid JSON: {}", rejection)))?;
        value
            .validate()
            .map_err(|errors| bad_request(describe(&errors)))?;
        Ok(Self(value))
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid {}", field, e.code),
            })
        })
        .collect();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Checkpoint {
        #[validate(length(min = 1, max = 10))]
        destination: String,
        #[validate(range(min = 0.0, message = "must not be negative"))]
        reading: f64,
    }

    async fn post_body(body: Body) -> (StatusCode, Value) {
        let router = Router::new().route(
            "/checkpoint",
            post(|ValidatedJson(c): ValidatedJson<Checkpoint>| async move { c.destination }),
        );
        let request = axum::http::Request::post("/checkpoint")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let body = json!({"destination": "Depot", "reading": 1200.5}).to_string();
        let (status, _) = post_body(Body::from(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post_body(Body::from("{destination")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn rule_violations_name_each_field() {
        let body = json!({"destination": "", "reading": -1.0}).to_string();
        let (status, body) = post_body(Body::from(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("destination: invalid length"));
        assert!(message.ends_with("reading: must not be negative"));
    }
}
