//! Client module for talking to the ZIA API
//!
//! This module contains the session plumbing every API call goes through:
//! - OAuth client-credentials token acquisition and refresh
//! - A minimum-interval rate gate
//! - The authenticated HTTP gateway with its single 429 retry

mod gateway;
mod rate_gate;
mod token;

pub use gateway::{
    build_http_client, parse_retry_after, Gateway, RetryPolicy, API_PREFIX, RETRY_AFTER_FIELD,
};
pub use rate_gate::RateGate;
pub use token::{effective_lifetime, Token, TokenManager, DEFAULT_TOKEN_LIFETIME};
