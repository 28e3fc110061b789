//! HTTP client for the VinLedger REST API.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use vinledger_core::{
    Authority, NewVehicle, NewVerification, QrPayload, Statistics, Vehicle, VehicleStatus,
    Verification,
};

/// QR payload as served by `GET /api/vehicles/{id}/qr`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrResponse {
    #[serde(flatten)]
    pub payload: QrPayload,
    pub qr_image_url: String,
}

/// Response of a successful authority login
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub authority: Authority,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed wrapper over the registry endpoints.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vinledger-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register_vehicle(&self, input: &NewVehicle) -> Result<Vehicle> {
        self.send(Method::POST, "/api/vehicles", Some(input)).await
    }

    pub async fn vehicle(&self, id: u64) -> Result<Option<Vehicle>> {
        self.fetch_optional(&format!("/api/vehicles/{}", id)).await
    }

    pub async fn vehicle_by_vin(&self, vin: &str) -> Result<Option<Vehicle>> {
        self.fetch_optional(&format!("/api/search/vin/{}", segment(vin)?))
            .await
    }

    pub async fn vehicle_by_plates(&self, plates: &str) -> Result<Option<Vehicle>> {
        self.fetch_optional(&format!("/api/search/plates/{}", segment(plates)?))
            .await
    }

    pub async fn vehicle_by_nft_id(&self, nft_id: &str) -> Result<Option<Vehicle>> {
        self.fetch_optional(&format!("/api/search/nft/{}", segment(nft_id)?))
            .await
    }

    pub async fn update_status(&self, id: u64, status: VehicleStatus) -> Result<Vehicle> {
        self.send(
            Method::PATCH,
            &format!("/api/vehicles/{}/status", id),
            Some(&json!({ "status": status })),
        )
        .await
    }

    pub async fn verifications(&self, vehicle_id: u64) -> Result<Vec<Verification>> {
        self.send::<(), _>(
            Method::GET,
            &format!("/api/vehicles/{}/verifications", vehicle_id),
            None,
        )
        .await
    }

    pub async fn record_verification(&self, input: &NewVerification) -> Result<Verification> {
        self.send(Method::POST, "/api/verifications", Some(input))
            .await
    }

    pub async fn statistics(&self) -> Result<Statistics> {
        self.send::<(), _>(Method::GET, "/api/statistics", None)
            .await
    }

    pub async fn qr(&self, vehicle_id: u64) -> Result<Option<QrResponse>> {
        self.fetch_optional(&format!("/api/vehicles/{}/qr", vehicle_id))
            .await
    }

    pub async fn login(&self, authority_id: &str, access_key: &str) -> Result<LoginResponse> {
        self.send(
            Method::POST,
            "/api/authorities/login",
            Some(&json!({ "authorityId": authority_id, "accessKey": access_key })),
        )
        .await
    }

    /// GET a record, mapping 404 to `None`.
    async fn fetch_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.execute::<()>(Method::GET, path, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.execute(method, path, body).await?;
        decode(response).await
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .with_context(|| format!("Server unreachable at {}", self.base_url))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .context("Failed to decode server response");
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
    debug!(status = status.as_u16(), %message, "Request rejected");
    bail!("Server returned {}: {}", status.as_u16(), message)
}

/// Percent-encode a free-form value for use as one path segment.
fn segment(value: &str) -> Result<String> {
    let mut url = reqwest::Url::parse("http://localhost/").context("Invalid base URL")?;
    url.path_segments_mut()
        .map_err(|()| anyhow!("URL cannot carry path segments"))?
        .push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("ABC-123-XYZ").unwrap(), "ABC-123-XYZ");
        assert_eq!(segment("AB 12/3").unwrap(), "AB%2012%2F3");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RegistryClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_qr_response_decodes_flattened_payload() {
        let raw = r#"{"vin":"1HGBH41JXMN109186","nftId":"1234","verifyUrl":"http://x/verify/1","qrImageUrl":"https://img"}"#;
        let qr: QrResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(qr.payload.nft_id, "1234");
        assert_eq!(qr.qr_image_url, "https://img");
    }
}
