//! Client identifier extractor.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;

/// Caller identity used to key the quota.
///
/// Never rejects: an unresolvable address yields `ClientId(None)`, leaving
/// the decision to the service, which fails with
/// [`AppError::MissingClientId`](crate::error::AppError::MissingClientId).
///
/// The peer address comes from [`ConnectInfo`], so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub Option<String>);

impl ClientId {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self(extract_client_ip(
            &parts.headers,
            peer,
            state.behind_proxy,
        )))
    }
}
