#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod error;

pub use error::DocError;

/// Helpers for tests in sibling crates, enabled by the `test-support` feature.
#[cfg(feature = "test-support")]
pub mod test_support {
    use crate::auth::DocCredential;
    use crate::client::DocClient;
    use wiremock::MockServer;

    /// API key used by mock-server tests (not a real key).
    pub const TEST_API_KEY: &str = "test-api-key";

    /// Create a client wired to a wiremock server.
    pub fn mock_client(server: &MockServer) -> DocClient {
        DocClient::builder()
            .endpoint(server.uri())
            .credential(DocCredential::api_key(TEST_API_KEY))
            .build()
            .expect("should build client")
    }
}
