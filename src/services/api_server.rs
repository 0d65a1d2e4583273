// src/services/api_server.rs
//! API Server for the signature notary
//!
//! Exposes the signing core over HTTP with JSON bodies. The server also does
//! the collaborator work the core stays out of: it applies the identity
//! policy, stamps missing timestamps, stores issued bundles and keeps the
//! per-identity signature counters.
//!
//! The API is built using Axum and includes endpoints for:
//! - Signature issuance and verification
//! - Public key discovery for offline verifiers
//! - Trust level lookup
//! - Shareable verification links

use crate::error::NotaryError;
use crate::keys::registry::KeyRegistry;
use crate::models::signature::{
    PublicKeysDocument, ShareLink, SignatureBundle, SignaturePayload, SigningRequest,
    VerificationRequest, VerificationResult,
};
use crate::models::trust::TrustReport;
use crate::services::signer::Signer;
use crate::services::trust::report_for;
use crate::services::verifier::Verifier;
use crate::settings::{PolicySettings, ShareSettings};
use crate::storage::signature_store::SignatureStore;
use crate::utils::codec::{decode_token, encode_token};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

/// Query string of a shareable verification link
#[derive(Deserialize)]
struct ShareQuery {
    data: String,
}

/// Error body returned by every failing endpoint: `{ "error": "..." }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<NotaryError> for ApiError {
    /// Caller errors keep their detail; deployment errors are logged and
    /// answered with a generic message.
    fn from(err: NotaryError) -> Self {
        if err.is_caller_error() {
            return ApiError::new(StatusCode::BAD_REQUEST, err.to_string());
        }
        error!("Request failed: {}", err);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

impl From<JsonRejection> for ApiError {
    /// Syntax errors, missing fields and wrong types all answer 400.
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// API server state containing all service dependencies
#[derive(Clone)]
pub struct ApiServer {
    /// Issues signatures with the current key
    signer: Signer,

    /// Checks signatures against the accepted key set
    verifier: Verifier,

    /// Key source, also used for the discovery document
    registry: Arc<KeyRegistry>,

    /// Bundle persistence and signature counters
    store: Arc<dyn SignatureStore>,

    /// Which identities may request signatures
    policy: PolicySettings,

    /// Base URL for verification links
    share: ShareSettings,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `registry` - Shared key registry
    /// * `store` - Bundle and counter store
    /// * `policy` - Identity policy applied before signing
    /// * `share` - Settings for verification links
    pub fn new(
        registry: Arc<KeyRegistry>,
        store: Arc<dyn SignatureStore>,
        policy: PolicySettings,
        share: ShareSettings,
    ) -> Self {
        ApiServer {
            signer: Signer::new(registry.clone()),
            verifier: Verifier::new(registry.clone()),
            registry,
            store,
            policy,
            share,
        }
    }

    /// Builds the router with all routes and shared state attached
    pub fn router(&self) -> Router {
        let discovery: Router<Arc<ApiServer>> = Router::new()
            .route("/.well-known/public-keys.json", get(Self::public_keys_handler))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET]),
            )
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=0, must-revalidate"),
            ));

        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/api/sign", post(Self::sign_handler))
            .route("/api/verify", post(Self::verify_handler))
            .route("/api/trust/:identity", get(Self::trust_handler))
            .route("/api/share/:signature", get(Self::share_handler))
            .route("/verify", get(Self::open_share_handler))
            .merge(discovery)
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API server listening on http://{}", addr);
        axum::serve(listener, self.router()).await
    }

    async fn health_handler() -> impl IntoResponse {
        Json(json!({ "status": "ok" }))
    }

    /// Issues a signature bundle
    ///
    /// # Endpoint
    /// POST /api/sign
    ///
    /// # Responses
    /// - 200 OK: Signature bundle
    /// - 400 Bad Request: Unparseable body, malformed fingerprint, identity or timestamp
    /// - 403 Forbidden: Identity outside the allowed email domains
    /// - 500 Internal Server Error: No signing key configured
    async fn sign_handler(
        State(state): State<Arc<ApiServer>>,
        body: Result<Json<SigningRequest>, JsonRejection>,
    ) -> Result<Json<SignatureBundle>, ApiError> {
        let Json(request) = body?;
        if !state.policy.is_allowed_identity(&request.identity) {
            warn!("Rejected signing request for disallowed identity {}", request.identity);
            return Err(ApiError::new(StatusCode::FORBIDDEN, "Identity not allowed"));
        }

        let timestamp = request
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let payload = SignaturePayload::new(request.fingerprint, request.identity, timestamp);
        let bundle = state.signer.issue(&payload)?;

        state.store.save_bundle(&bundle);
        state
            .store
            .increment_signatures(&payload.identity.to_lowercase());

        Ok(Json(bundle))
    }

    /// Verifies a signature against every accepted key
    ///
    /// # Endpoint
    /// POST /api/verify
    ///
    /// # Responses
    /// - 200 OK: `{ valid, publicKey }`, `publicKey` is null when nothing matched
    /// - 400 Bad Request: Unparseable body, malformed payload, empty or undecodable signature
    async fn verify_handler(
        State(state): State<Arc<ApiServer>>,
        body: Result<Json<VerificationRequest>, JsonRejection>,
    ) -> Result<Json<VerificationResult>, ApiError> {
        let Json(request) = body?;
        let matched = state
            .verifier
            .verify_against_accepted_keys(&request.payload, &request.signature)?;

        Ok(Json(VerificationResult::from_match(
            matched.map(|key| key.to_spki_base64()),
        )))
    }

    /// Publishes the current and historical public keys
    ///
    /// # Endpoint
    /// GET /.well-known/public-keys.json
    async fn public_keys_handler(
        State(state): State<Arc<ApiServer>>,
    ) -> Result<Json<PublicKeysDocument>, ApiError> {
        Ok(Json(state.registry.discovery_document()?))
    }

    /// Reports the trust bucket for an identity
    ///
    /// # Endpoint
    /// GET /api/trust/:identity
    ///
    /// # Responses
    /// - 200 OK: `{ identity, totalSignatures, trustLevel }`
    /// - 400 Bad Request: Not an address, or outside the allowed email domains
    async fn trust_handler(
        State(state): State<Arc<ApiServer>>,
        Path(identity): Path<String>,
    ) -> Result<Json<TrustReport>, ApiError> {
        let identity = identity.trim().to_lowercase();
        if !state.policy.accepts_address(&identity) {
            return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid identity"));
        }
        let count = state.store.signature_count(&identity);
        Ok(Json(report_for(&identity, count)))
    }

    /// Builds a shareable verification link for a stored bundle
    ///
    /// # Endpoint
    /// GET /api/share/:signature
    ///
    /// # Responses
    /// - 200 OK: `{ token, verifyUrl }`
    /// - 404 Not Found: No bundle stored under that signature
    async fn share_handler(
        State(state): State<Arc<ApiServer>>,
        Path(signature): Path<String>,
    ) -> Result<Json<ShareLink>, ApiError> {
        let bundle = state.store.bundle(&signature).ok_or_else(|| {
            warn!("Share link requested for unknown signature");
            ApiError::new(StatusCode::NOT_FOUND, "Signature not found")
        })?;

        let token = encode_token(&bundle)?;
        let verify_url = state.share.verification_url(&token);
        Ok(Json(ShareLink { token, verify_url }))
    }

    /// Decodes the bundle carried by a verification link
    ///
    /// # Endpoint
    /// GET /verify?data=<token>
    async fn open_share_handler(
        Query(query): Query<ShareQuery>,
    ) -> Result<Json<SignatureBundle>, ApiError> {
        Ok(Json(decode_token(&query.data)?))
    }
}
