//! Request construction and raw responses.
//!
//! Every generated operation builds its request the same way: expand the
//! URL template with percent-encoded path parameters, attach `api-version`
//! and option query parameters, then optionally serialize a JSON body.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{ArmError, ResponseError, Result};

/// Placeholder for the subscription ID in URL templates.
const SUBSCRIPTION_PLACEHOLDER: &str = "{subscriptionId}";

/// A URL template being filled in with path parameters.
#[derive(Debug, Clone)]
pub(crate) struct UrlPath {
    path: String,
}

impl UrlPath {
    pub(crate) fn new(template: &str) -> Self {
        Self {
            path: template.to_string(),
        }
    }

    /// Substitute `{name}` with the percent-encoded value.
    pub(crate) fn param(mut self, name: &'static str, value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(ArmError::EmptyParameter(name));
        }
        let placeholder = format!("{{{name}}}");
        self.path = self
            .path
            .replace(&placeholder, &urlencoding::encode(value));
        Ok(self)
    }

    /// Substitute `{name}` with the value as-is, for parameters that are
    /// themselves paths such as resource IDs.
    pub(crate) fn raw_param(mut self, name: &'static str, value: &str) -> Result<Self> {
        let value = value.trim_start_matches('/');
        if value.is_empty() {
            return Err(ArmError::EmptyParameter(name));
        }
        self.path = self.path.replace(&format!("{{{name}}}"), value);
        Ok(self)
    }

    /// Substitute `{subscriptionId}` with the client's subscription.
    pub(crate) fn subscription(mut self, subscription_id: &str) -> Result<Self> {
        if subscription_id.is_empty() {
            return Err(ArmError::EmptyParameter("client.subscriptionID"));
        }
        self.path = self
            .path
            .replace(SUBSCRIPTION_PLACEHOLDER, &urlencoding::encode(subscription_id));
        Ok(self)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.path
    }
}

/// Join an absolute path onto an endpoint, keeping any endpoint path prefix.
pub(crate) fn join_paths(endpoint: &Url, path: &str) -> Result<Url> {
    let base = endpoint.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

/// A fully-built ARM request.
#[derive(Debug, Clone)]
pub struct ArmRequest {
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
}

impl ArmRequest {
    /// Create a request for the given method and URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Append a query parameter when the value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, &v.to_string()),
            None => self,
        }
    }

    /// Set the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body fails to serialize.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URL including query.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// A response whose body has been read into memory.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Method of the request that produced this response.
    pub method: Method,
    /// URL of the request that produced this response.
    pub url: Url,
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Whether the status is one of `codes`.
    pub fn has_status(&self, codes: &[u16]) -> bool {
        codes.contains(&self.status)
    }

    /// Get a header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the body is empty or whitespace.
    pub fn is_empty_body(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Unmarshal the body; an empty body yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.is_empty_body() {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Unmarshal the body as an untyped JSON value, `Null` when empty.
    pub fn json_value(&self) -> serde_json::Value {
        if self.is_empty_body() {
            return serde_json::Value::Null;
        }
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// Wrap this response in a [`ResponseError`].
    pub fn into_error(self) -> ArmError {
        let error_code = self
            .header("x-ms-error-code")
            .map(str::to_string)
            .or_else(|| {
                self.json_value()
                    .get("error")
                    .and_then(|e| e.get("code"))
                    .and_then(|c| c.as_str())
                    .map(str::to_string)
            });

        let mut url = self.url.clone();
        url.set_query(None);

        ResponseError {
            method: self.method.to_string(),
            url: url.to_string(),
            status_code: self.status,
            error_code,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_path_substitutes_and_encodes() {
        let path = UrlPath::new(
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.EventHub/namespaces/{namespaceName}",
        )
        .subscription("sub-1")
        .and_then(|p| p.param("resourceGroupName", "my rg"))
        .and_then(|p| p.param("namespaceName", "ns/1"))
        .unwrap();

        assert_eq!(
            path.as_str(),
            "/subscriptions/sub-1/resourceGroups/my%20rg/providers/Microsoft.EventHub/namespaces/ns%2F1"
        );
    }

    #[test]
    fn test_url_path_rejects_empty_parameter() {
        let err = UrlPath::new("/resourceGroups/{resourceGroupName}")
            .param("resourceGroupName", "")
            .unwrap_err();
        assert_eq!(err.to_string(), "parameter resourceGroupName cannot be empty");

        let err = UrlPath::new("/subscriptions/{subscriptionId}")
            .subscription("")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter client.subscriptionID cannot be empty"
        );
    }

    #[test]
    fn test_raw_param_keeps_slashes() {
        let path = UrlPath::new("/{resourceId}")
            .raw_param("resourceId", "/subscriptions/s/resourceGroups/rg")
            .unwrap();
        assert_eq!(path.as_str(), "/subscriptions/s/resourceGroups/rg");

        let err = UrlPath::new("/{resourceId}").raw_param("resourceId", "/").unwrap_err();
        assert!(matches!(err, ArmError::EmptyParameter("resourceId")));
    }

    #[test]
    fn test_join_paths() {
        let endpoint = Url::parse("https://management.azure.com/").unwrap();
        let url = join_paths(&endpoint, "/subscriptions/abc").unwrap();
        assert_eq!(url.as_str(), "https://management.azure.com/subscriptions/abc");

        let prefixed = Url::parse("http://127.0.0.1:9000/arm").unwrap();
        let url = join_paths(&prefixed, "/subscriptions/abc").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/arm/subscriptions/abc");
    }

    #[test]
    fn test_request_query_and_body() {
        let url = Url::parse("https://management.azure.com/subscriptions/abc").unwrap();
        let req = ArmRequest::new(Method::PUT, url)
            .query("api-version", "2024-01-01")
            .query_opt("$top", Some(10))
            .query_opt::<u32>("$skip", None)
            .json(&serde_json::json!({"location": "westus"}))
            .unwrap();

        let pairs: Vec<(String, String)> = req.url().query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("api-version".to_string(), "2024-01-01".to_string()),
                ("$top".to_string(), "10".to_string()),
            ]
        );
        assert_eq!(req.body().unwrap(), br#"{"location":"westus"}"#);
    }

    #[test]
    fn test_raw_response_error_code_from_body() {
        let resp = RawResponse {
            method: Method::GET,
            url: Url::parse("https://management.azure.com/x?api-version=1").unwrap(),
            status: 404,
            headers: HeaderMap::new(),
            body: br#"{"error":{"code":"ResourceNotFound","message":"gone"}}"#.to_vec(),
        };

        let err = resp.into_error();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.error_code(), Some("ResourceNotFound"));
        assert!(err.to_string().starts_with("GET https://management.azure.com/x\n"));
    }

    #[test]
    fn test_raw_response_empty_body_defaults() {
        let resp = RawResponse {
            method: Method::DELETE,
            url: Url::parse("https://management.azure.com/x").unwrap(),
            status: 204,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        let value: Option<String> = resp.json().unwrap();
        assert!(value.is_none());
    }
}
