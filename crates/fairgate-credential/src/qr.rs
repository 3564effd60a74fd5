// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! QR rendering of credential tokens as inline SVG data URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::svg;

use fairgate_core::FairgateError;

/// Minimum rendered dimensions in SVG user units. Large enough to scan
/// reliably from a phone screen held up to a booth scanner.
const MIN_DIMENSIONS: u32 = 240;

/// Renders a token into a `data:image/svg+xml;base64,...` URI suitable for
/// an `<img src>` attribute. No network round trip, no external service.
pub fn render_data_uri(token: &str) -> Result<String, FairgateError> {
    let code = QrCode::new(token.as_bytes()).map_err(|e| FairgateError::Encoding {
        message: format!("QR encoding failed: {e:?}"),
        source: None,
    })?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(MIN_DIMENSIONS, MIN_DIMENSIONS)
        .build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image)
    ))
}
