// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Check-in deep link construction.

/// Builds the deep link a recipient can follow independently of the
/// credential image: `{base}?visitorId={id}&boothId={boothId}`.
///
/// Identifiers come from registration storage and are URL-safe by
/// construction there; query-reserved characters are still percent-encoded
/// so a stray value cannot break the link.
pub fn check_in_link(base_url: &str, visitor_id: &str, booth_id: &str) -> String {
    format!(
        "{}?visitorId={}&boothId={}",
        base_url.trim_end_matches('?'),
        percent_encode(visitor_id),
        percent_encode(booth_id)
    )
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
