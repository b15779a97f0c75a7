use crate::error::{DocError, DocResult};
use secrecy::{ExposeSecret, SecretString};

/// The header used for API key authentication.
pub(crate) const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Credential types supported by the Document Analysis SDK.
#[derive(Clone)]
pub enum DocCredential {
    /// API key authentication, sent as the `Ocp-Apim-Subscription-Key` header.
    ApiKey(SecretString),

    /// A pre-issued bearer token, sent as `Authorization: Bearer ...`.
    BearerToken(SecretString),
}

/// A resolved authentication header: name and value.
pub(crate) struct AuthHeader {
    pub name: &'static str,
    pub value: String,
}

impl DocCredential {
    /// Create a credential from the environment.
    ///
    /// Reads `DOC_ANALYSIS_API_KEY` first, then `DOC_ANALYSIS_TOKEN`.
    pub fn from_env() -> DocResult<Self> {
        if let Ok(key) = std::env::var("DOC_ANALYSIS_API_KEY") {
            if !key.is_empty() {
                return Ok(Self::ApiKey(SecretString::from(key)));
            }
        }
        match std::env::var("DOC_ANALYSIS_TOKEN") {
            Ok(token) if !token.is_empty() => Ok(Self::BearerToken(SecretString::from(token))),
            _ => Err(DocError::Auth(
                "no credential found. Set DOC_ANALYSIS_API_KEY or DOC_ANALYSIS_TOKEN.".into(),
            )),
        }
    }

    /// Create an API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(SecretString::from(key.into()))
    }

    /// Create a bearer token credential.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(SecretString::from(token.into()))
    }

    /// Resolve the credential to the header it contributes to each request.
    pub(crate) fn resolve(&self) -> AuthHeader {
        match self {
            Self::ApiKey(key) => AuthHeader {
                name: API_KEY_HEADER,
                value: key.expose_secret().to_string(),
            },
            Self::BearerToken(token) => AuthHeader {
                name: "Authorization",
                value: format!("Bearer {}", token.expose_secret()),
            },
        }
    }
}

impl std::fmt::Debug for DocCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "DocCredential::ApiKey(****)"),
            Self::BearerToken(_) => write!(f, "DocCredential::BearerToken(****)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn api_key_resolves_to_subscription_key_header() {
        let header = DocCredential::api_key("secret-key").resolve();
        assert_eq!(header.name, "Ocp-Apim-Subscription-Key");
        assert_eq!(header.value, "secret-key");
    }

    #[test]
    fn bearer_token_resolves_to_authorization_header() {
        let header = DocCredential::bearer_token("tok-123").resolve();
        assert_eq!(header.name, "Authorization");
        assert_eq!(header.value, "Bearer tok-123");
    }

    #[test]
    fn debug_never_prints_the_secret() {
        let debug = format!("{:?}", DocCredential::api_key("super-secret"));
        assert!(!debug.contains("super-secret"), "got: {debug}");
        assert!(debug.contains("****"));
    }

    #[test]
    #[serial]
    fn from_env_prefers_api_key() {
        std::env::set_var("DOC_ANALYSIS_API_KEY", "env-key");
        std::env::set_var("DOC_ANALYSIS_TOKEN", "env-token");

        let cred = DocCredential::from_env().expect("should resolve");
        assert!(matches!(cred, DocCredential::ApiKey(_)));

        std::env::remove_var("DOC_ANALYSIS_API_KEY");
        std::env::remove_var("DOC_ANALYSIS_TOKEN");
    }

    #[test]
    #[serial]
    fn from_env_falls_back_to_token() {
        std::env::remove_var("DOC_ANALYSIS_API_KEY");
        std::env::set_var("DOC_ANALYSIS_TOKEN", "env-token");

        let cred = DocCredential::from_env().expect("should resolve");
        assert!(matches!(cred, DocCredential::BearerToken(_)));

        std::env::remove_var("DOC_ANALYSIS_TOKEN");
    }

    #[test]
    #[serial]
    fn from_env_errors_when_nothing_is_set() {
        std::env::remove_var("DOC_ANALYSIS_API_KEY");
        std::env::remove_var("DOC_ANALYSIS_TOKEN");

        let err = DocCredential::from_env().expect_err("should fail");
        assert!(matches!(err, DocError::Auth(_)));
    }
}
