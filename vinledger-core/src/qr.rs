//! QR code payloads for vehicle verification.
//!
//! The service never renders images. A QR code carries a JSON
//! [`QrPayload`]; the image itself comes from a public rendering API whose
//! URL [`qr_image_url`] builds.

use serde::{Deserialize, Serialize};

/// Public QR rendering endpoint
pub const QR_RENDER_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default rendered image edge, in pixels
pub const DEFAULT_QR_SIZE: u32 = 128;

/// Length of a vehicle identification number
pub const VIN_LENGTH: usize = 17;

/// Data encoded in a vehicle's QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    #[cfg_attr(feature = "openapi", schema(example = "1HGBH41JXMN109186"))]
    pub vin: String,
    #[cfg_attr(feature = "openapi", schema(example = "1234"))]
    pub nft_id: String,
    #[cfg_attr(feature = "openapi", schema(example = "http://localhost:3000/verify/1"))]
    pub verify_url: String,
}

/// Result of scanning a QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedCode {
    /// A full payload produced by this service
    Payload(QrPayload),
    /// A bare 17-character string, taken as a VIN
    Vin(String),
}

impl ScannedCode {
    pub fn vin(&self) -> &str {
        match self {
            Self::Payload(payload) => &payload.vin,
            Self::Vin(vin) => vin,
        }
    }
}

/// QR reference stored on every vehicle
pub fn qr_reference(vin: &str) -> String {
    format!("qr_{vin}")
}

/// Public verification page for a vehicle
pub fn verification_url(base_url: &str, vehicle_id: u64) -> String {
    format!("{}/verify/{}", base_url.trim_end_matches('/'), vehicle_id)
}

/// Vehicle id from the first `/verify/<digits>` segment of a URL
pub fn vehicle_id_from_url(url: &str) -> Option<u64> {
    url.match_indices("/verify/").find_map(|(start, marker)| {
        let rest = &url[start + marker.len()..];
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .map_or(rest, |end| &rest[..end]);
        digits.parse().ok()
    })
}

/// Image URL rendering `data` as a `size`x`size` QR code
pub fn qr_image_url(data: &str, size: u32) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(data.as_bytes()).collect();
    format!("{QR_RENDER_ENDPOINT}?size={size}x{size}&data={encoded}")
}

/// Interpret scanned QR text.
///
/// JSON payloads need non-empty `vin` and `nftId`. Anything that is not JSON
/// is accepted as a VIN when it is exactly 17 characters long.
pub fn parse_qr_data(raw: &str) -> Option<ScannedCode> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => {
            let vin = value.get("vin")?.as_str().filter(|s| !s.is_empty())?;
            let nft_id = value.get("nftId")?.as_str().filter(|s| !s.is_empty())?;
            let verify_url = value
                .get("verifyUrl")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Some(ScannedCode::Payload(QrPayload {
                vin: vin.to_string(),
                nft_id: nft_id.to_string(),
                verify_url: verify_url.to_string(),
            }))
        }
        Err(_) if raw.chars().count() == VIN_LENGTH => Some(ScannedCode::Vin(raw.to_string())),
        Err(_) => None,
    }
}

/// Check the VIN alphabet: 17 characters of `A-Z` and `0-9`, excluding
/// `I`, `O` and `Q`. The store does not enforce this.
pub fn is_valid_vin(vin: &str) -> bool {
    vin.len() == VIN_LENGTH
        && vin
            .chars()
            .all(|c| c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q')))
}
