use crate::User;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path (appended to the configured base URL).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Request Definitions
// =========================================================

/// Authenticate with email + password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Create an account.
///
/// Field names follow the server's wire format, including its
/// misspelled `prefferedLang` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: String,
    pub location: String,
    #[serde(rename = "prefferedLang")]
    pub preffered_lang: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Profile fields accepted by both profile-update endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, rename = "prefLang", skip_serializing_if = "Option::is_none")]
    pub pref_lang: Option<String>,
}

/// Update a farmer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateFarmerProfileRequest(pub ProfileUpdate);

impl ApiRequest for UpdateFarmerProfileRequest {
    type Response = ProfileResponse;
    const PATH: &'static str = "/user/profile";
    const METHOD: HttpMethod = HttpMethod::Put;
}

/// Update an officer profile (bearer-authenticated endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateOfficerProfileRequest(pub ProfileUpdate);

impl ApiRequest for UpdateOfficerProfileRequest {
    type Response = ProfileResponse;
    const PATH: &'static str = "/officer/me";
    const METHOD: HttpMethod = HttpMethod::Put;
}

/// Change the account password. The server owns password state; the
/// client session is untouched by this call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = EmptyResponse;
    const PATH: &'static str = "/user/change-password";
    const METHOD: HttpMethod = HttpMethod::Put;
}

/// Request a password-reset email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = EmptyResponse;
    const PATH: &'static str = "/auth/forgot-password";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Response Definitions
// =========================================================

/// Success shape of `/auth/login` and `/auth/register`.
///
/// Both fields are optional on purpose: a 2xx response missing either
/// one is a semantic failure decided by the session manager, not a
/// decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Success shape of the profile-update endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// For endpoints whose success body is empty or irrelevant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// Error body shape the server uses on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// =========================================================
// Unit Tests
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_request_wire_format() {
        let req = RegisterRequest {
            full_name: "Jane Farmer".into(),
            email: "jane@x.com".into(),
            phone_number: "712345678".into(),
            password: "pw".into(),
            role: "farmer".into(),
            location: "loc-1".into(),
            preffered_lang: "Swahili".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["fullName"], "Jane Farmer");
        assert_eq!(value["phoneNumber"], "712345678");
        // The server expects this exact spelling.
        assert_eq!(value["prefferedLang"], "Swahili");
        assert!(value.get("preferredLang").is_none());
    }

    #[test]
    fn change_password_wire_format() {
        let req = ChangePasswordRequest {
            current_password: "old".into(),
            new_password: "new".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["currentPassword"], "old");
        assert_eq!(value["newPassword"], "new");
    }

    #[test]
    fn profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            role: "farmer".into(),
            name: Some("Jane".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&UpdateFarmerProfileRequest(update)).unwrap();
        assert_eq!(value["role"], "farmer");
        assert_eq!(value["name"], "Jane");
        assert!(value.get("phoneNumber").is_none());
        assert!(value.get("location").is_none());
    }

    #[test]
    fn auth_response_tolerates_missing_fields() {
        let resp: AuthResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.token.is_none());
        assert!(resp.user.is_none());

        let resp: AuthResponse = serde_json::from_value(json!({"token": "T1"})).unwrap();
        assert_eq!(resp.token.as_deref(), Some("T1"));
        assert!(resp.user.is_none());
    }

    #[test]
    fn empty_response_decodes_from_empty_object() {
        let _: EmptyResponse = serde_json::from_str("{}").unwrap();
    }

    #[test]
    fn endpoint_metadata() {
        assert_eq!(LoginRequest::PATH, "/auth/login");
        assert_eq!(LoginRequest::METHOD, HttpMethod::Post);
        assert_eq!(UpdateFarmerProfileRequest::PATH, "/user/profile");
        assert_eq!(UpdateOfficerProfileRequest::PATH, "/officer/me");
        assert_eq!(ChangePasswordRequest::METHOD, HttpMethod::Put);
    }
}
