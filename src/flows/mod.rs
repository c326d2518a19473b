//! OAuth2 Flows
//!
//! Only the Client Credentials Flow (RFC 6749 Section 4.4) is needed: the
//! catalog client authenticates as itself, never on behalf of a user.

pub mod client_credentials;

pub use client_credentials::{
    create_mock_client_credentials_flow, ClientCredentialsFlow, ClientCredentialsFlowImpl,
    MockClientCredentialsFlow,
};
