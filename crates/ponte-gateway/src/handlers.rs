// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the bridge facade.
//!
//! Handles GET /status, GET /qr, POST /config/mail, POST /send-whatsapp,
//! POST /send-email. Every failure path returns structured JSON; channel
//! preconditions are checked here so an offline channel's transport is never
//! touched.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use ponte_core::{ConnectionState, MailStatus, ServerStatus};
use ponte_mail::{MailAuth, MailTransportConfig};

use crate::qr;
use crate::server::BridgeState;

/// Response body for GET /status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub messaging: ConnectionState,
    pub mail: MailStatus,
    pub server: ServerStatus,
}

/// Response body for GET /qr while a challenge is pending.
#[derive(Debug, Serialize)]
pub struct QrResponse {
    #[serde(rename = "qrImage")]
    pub qr_image: String,
}

/// Response body for GET /qr once the session is authenticated.
#[derive(Debug, Serialize)]
pub struct ConnectedResponse {
    pub status: &'static str,
    pub message: String,
}

/// Generic success acknowledgment.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Request body for POST /config/mail.
///
/// The wire shape is flat; `secure` is derived from the port (465 means
/// implicit TLS, anything else upgrades via STARTTLS).
#[derive(Debug, Deserialize)]
pub struct MailConfigRequest {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

/// Request body for POST /send-whatsapp.
#[derive(Debug, Deserialize)]
pub struct SendWhatsappRequest {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub message: String,
}

/// Request body for POST /send-email.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
    #[serde(rename = "fromName", default = "default_from_name")]
    pub from_name: String,
}

fn default_from_name() -> String {
    "Ponte".to_string()
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn internal_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// GET /status
///
/// Reports both channels plus the facade itself. `server` is always
/// `ONLINE`: answering at all is the proof.
pub async fn get_status(State(state): State<BridgeState>) -> Json<StatusResponse> {
    let snapshot = state.whatsapp.snapshot().await;
    Json(StatusResponse {
        messaging: snapshot.status,
        mail: state.mail.status().await,
        server: ServerStatus::Online,
    })
}

/// GET /qr
///
/// Returns the pending challenge as an embeddable image, an
/// already-connected marker when the session is live, or 404 while neither
/// exists.
pub async fn get_qr(State(state): State<BridgeState>) -> Response {
    let snapshot = state.whatsapp.snapshot().await;

    if let Some(challenge) = snapshot.qr {
        return match qr::qr_data_uri(&challenge) {
            Ok(qr_image) => Json(QrResponse { qr_image }).into_response(),
            Err(e) => {
                error!(error = %e, "failed to render QR challenge");
                internal_error(e.to_string())
            }
        };
    }

    if snapshot.status == ConnectionState::Ready {
        return Json(ConnectedResponse {
            status: "CONNECTED",
            message: "WhatsApp session is already authenticated".to_string(),
        })
        .into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "QR code is not available yet".to_string(),
        }),
    )
        .into_response()
}

/// POST /config/mail
///
/// Replaces the mail transport wholesale and persists it. Anything
/// structurally valid is accepted; a bad transport surfaces at send time.
pub async fn post_config_mail(
    State(state): State<BridgeState>,
    Json(body): Json<MailConfigRequest>,
) -> Response {
    let config = MailTransportConfig {
        secure: body.port == 465,
        host: body.host,
        port: body.port,
        auth: MailAuth {
            user: body.user,
            pass: body.pass,
        },
    };

    match state.mail.configure(config).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => {
            error!(error = %e, "failed to persist mail configuration");
            internal_error(e.to_string())
        }
    }
}

/// POST /send-whatsapp
///
/// Fails fast with 400 when the channel is offline or fields are missing;
/// transport failures come back as 500 with the native error message.
pub async fn post_send_whatsapp(
    State(state): State<BridgeState>,
    Json(body): Json<SendWhatsappRequest>,
) -> Response {
    if body.number.trim().is_empty() || body.message.is_empty() {
        return bad_request("number and message are required");
    }

    let snapshot = state.whatsapp.snapshot().await;
    if snapshot.status != ConnectionState::Ready {
        return bad_request("WhatsApp client is not connected");
    }

    match state.whatsapp.send_message(&body.number, &body.message).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => {
            error!(error = %e, "whatsapp send failed");
            internal_error(e.to_string())
        }
    }
}

/// POST /send-email
///
/// Fails fast with 400 when no credentials are configured; delivery errors
/// come back as 500.
pub async fn post_send_email(
    State(state): State<BridgeState>,
    Json(body): Json<SendEmailRequest>,
) -> Response {
    if !state.mail.is_configured().await {
        return bad_request("SMTP transport is not configured");
    }

    match state
        .mail
        .send(&body.to, &body.subject, &body.html, &body.from_name)
        .await
    {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => {
            error!(error = %e, "email send failed");
            internal_error(e.to_string())
        }
    }
}
