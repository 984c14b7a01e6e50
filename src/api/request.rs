//! Request descriptors for Catalyst Center API calls
//!
//! A descriptor is built per call, handed to the client, and dropped.

use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Attach a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up the first value for a query parameter
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_params_skipped() {
        let request = RequestDescriptor::get("/dna/intent/api/v1/issues")
            .param_opt("priority", Some("P1"))
            .param_opt::<&str>("siteId", None)
            .param("limit", 25);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.params.len(), 2);
        assert_eq!(request.param_value("priority"), Some("P1"));
        assert_eq!(request.param_value("limit"), Some("25"));
        assert_eq!(request.param_value("siteId"), None);
    }

    #[test]
    fn test_post_with_body() {
        let request = RequestDescriptor::post("/x").json(json!({"a": 1}));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(json!({"a": 1})));
    }
}
