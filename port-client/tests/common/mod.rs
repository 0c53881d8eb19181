//! Common test utilities for client integration tests.

#[allow(unused_imports)]
pub use port_client::{ClientConfig, ClientError, PortClient};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at a mock server with a pre-issued token.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> PortClient {
    let config = ClientConfig::new("test-client", "test-secret").with_base_url(server.uri());
    PortClient::with_access_token(&config, "test-token").expect("client")
}
