use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};

/// Request body normalised to a JSON object.
///
/// The body is decoded according to its `Content-Type` (JSON or
/// form-urlencoded). If that yields nothing usable the raw text is tried as
/// JSON, and if that fails too the map is empty. Only reading the body itself
/// can be rejected (for example when it exceeds the body limit).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(pub Map<String, Value>);

impl FieldMap {
    pub fn negotiate(headers: &HeaderMap, body: &[u8]) -> Self {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let fields = structured_decode(content_type, body)
            .or_else(|| json_object(body))
            .unwrap_or_else(|| {
                if !body.is_empty() {
                    tracing::debug!(
                        content_type = %content_type,
                        len = body.len(),
                        "Request body could not be decoded, treating as empty"
                    );
                }
                Map::new()
            });

        FieldMap(fields)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

fn structured_decode(content_type: &str, body: &[u8]) -> Option<Map<String, Value>> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        json_object(body)
    } else if mime == "application/x-www-form-urlencoded" {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).ok()?;
        Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    } else {
        None
    }
}

fn json_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[async_trait]
impl<S> FromRequest<S> for FieldMap
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state).await?;
        Ok(FieldMap::negotiate(&headers, &body))
    }
}
