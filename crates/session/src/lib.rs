//! Two-factor session delegations and signature-auth connections.
//!
//! A session lets a provider-held key act for an account after the owner
//! answers an out-of-band challenge. The hashing protocol in [`hash`] is
//! shared bit-for-bit with the on-chain session manager; [`backend`] talks
//! to the provider's HTTP API and [`flow`] drives the on-chain lifecycle.
//! [`connect`] is the lighter signature-auth scheme used to prove account
//! control to web backends.

pub mod backend;
pub mod connect;
pub mod flow;
pub mod hash;

mod error;

pub use backend::{SessionRequestResult, confirm_session_request, send_session_request};
pub use connect::{
    ConnectedHeaders, create_connected_url, generate_connected_headers,
    generate_connection_message, verify_connected_headers, verify_connected_url,
};
pub use error::SessionError;
pub use flow::{
    confirm_session, get_two_factor_address, is_session_expired, revoke_session,
    submit_session_request, verify_incoming_session_request, verify_session_confirm,
    verify_session_request,
};
pub use hash::{session_hash, session_request_hash, session_salt};
