//! Credential descriptor for the Forgejo API.

use crate::schema::{FieldKind, ParameterField};
use crate::types::RequestDescriptor;
use serde_json::{json, Value};

pub const CREDENTIAL_NAME: &str = "forgejoApi";
pub const DISPLAY_NAME: &str = "Forgejo API";
pub const DOCUMENTATION_URL: &str = "https://forgejo.org/docs/latest/user/api-usage/";
pub const DEFAULT_SERVER_URL: &str = "https://code.squarecows.com";
/// Fixed prefix appended to the server URL for every call.
pub const API_PREFIX: &str = "/api/v1";

pub fn properties() -> Vec<ParameterField> {
    vec![
        ParameterField::new(
            "serverUrl",
            "Forgejo Server URL",
            FieldKind::String,
            json!(DEFAULT_SERVER_URL),
        )
        .required()
        .describe("The URL of your Forgejo server"),
        ParameterField::new("accessToken", "Access Token", FieldKind::Password, json!(""))
            .required()
            .describe(
                "API token for authentication. You can generate one in your Forgejo settings under Applications, Generate New Token.",
            ),
    ]
}

/// Value of the `Authorization` header for `access_token`.
pub fn authorization_value(access_token: &str) -> String {
    format!("token {}", access_token)
}

/// Request used to validate a credential: the authenticated user.
pub fn test_request() -> RequestDescriptor {
    RequestDescriptor::get("/user")
}

/// `{server_url}/api/v1`, tolerating a trailing slash on the server URL.
pub fn api_base(server_url: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), API_PREFIX)
}

pub fn describe() -> Value {
    json!({
        "name": CREDENTIAL_NAME,
        "displayName": DISPLAY_NAME,
        "documentationUrl": DOCUMENTATION_URL,
        "properties": properties(),
        "authenticate": {
            "type": "generic",
            "headers": { "Authorization": "token {{accessToken}}" },
        },
        "test": {
            "baseURL": format!("{{{{serverUrl}}}}{}", API_PREFIX),
            "url": test_request().path,
            "method": test_request().method.as_str(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;

    #[test]
    fn header_uses_token_scheme() {
        assert_eq!(authorization_value("abc123"), "token abc123");
    }

    #[test]
    fn test_request_targets_authenticated_user() {
        let req = test_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/user");
        assert!(req.query.is_none() && req.body.is_none());
    }

    #[test]
    fn api_base_trims_trailing_slash() {
        assert_eq!(api_base("https://code.squarecows.com/"), "https://code.squarecows.com/api/v1");
        assert_eq!(api_base("http://localhost:3000"), "http://localhost:3000/api/v1");
    }

    #[test]
    fn descriptor_fields() {
        let d = describe();
        assert_eq!(d["name"], "forgejoApi");
        assert_eq!(d["properties"][0]["default"], DEFAULT_SERVER_URL);
        assert_eq!(d["properties"][1]["kind"], "password");
        assert_eq!(d["test"]["baseURL"], "{{serverUrl}}/api/v1");
    }
}
