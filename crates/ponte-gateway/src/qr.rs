// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! QR challenge rendering.
//!
//! The automation runtime hands the bridge a raw challenge string; the
//! frontend wants something it can drop into an `<img>` tag. Render the
//! challenge as SVG and wrap it in a base64 data URI.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::svg;

use ponte_core::PonteError;

const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Render a challenge string as an embeddable SVG data URI.
pub fn qr_data_uri(challenge: &str) -> Result<String, PonteError> {
    let code = QrCode::new(challenge.as_bytes()).map_err(|e| {
        PonteError::Internal(format!("failed to encode QR challenge: {e}"))
    })?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(360, 360)
        .quiet_zone(true)
        .build();

    Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(image.as_bytes())))
}
