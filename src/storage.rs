use crate::core::StorageConfig;
use crate::errors::{FloodscopeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use tracing::info;

type HmacSha256 = Hmac<Sha256>;

/// Durable reference to an uploaded artifact. Consumers treat it as opaque
/// apart from handing it back to a signer.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    /// Unsigned object URL. Durable, but only fetchable if the bucket
    /// policy allows anonymous reads.
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under `key`, overwriting any existing object.
    async fn upload(&self, local_path: &Path, key: &str) -> Result<StoredObject>;
}

pub trait UrlSigner: Send + Sync {
    /// Produce a time-limited fetchable URL for an uploaded object.
    fn signed_url(&self, object: &StoredObject, expires_in: Duration) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

/// S3-compatible store. Uploads PUT the bytes against a presigned URL, so
/// the only protocol surface is SigV4 query presigning plus plain HTTP.
pub struct S3Store {
    client: reqwest::Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    credentials: Credentials,
    upload_expiry: Duration,
}

impl S3Store {
    pub fn new(config: &StorageConfig, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            credentials,
            upload_expiry: Duration::from_secs(config.presign_expiry_secs),
        }
    }

    /// Construct from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
    pub fn from_env(config: &StorageConfig) -> Result<Self> {
        let access_key = require_env("AWS_ACCESS_KEY_ID")?;
        let secret_key = require_env("AWS_SECRET_ACCESS_KEY")?;
        if config.bucket.is_empty() {
            return Err(FloodscopeError::ConfigurationError(
                "storage bucket is not configured".to_string(),
            ));
        }
        Ok(Self::new(
            config,
            Credentials {
                access_key,
                secret_key,
            },
        ))
    }

    /// Scheme+authority, the authority alone (the signed `host` header), and
    /// the canonical path for `key`. Virtual-hosted AWS addressing by
    /// default, path-style when an endpoint override is configured.
    fn addressing(&self, key: &str) -> Result<(String, String, String)> {
        match &self.endpoint {
            Some(endpoint) => {
                let parsed = url::Url::parse(endpoint).map_err(|e| {
                    FloodscopeError::StorageError(format!("invalid endpoint '{}': {}", endpoint, e))
                })?;
                let host = parsed.host_str().ok_or_else(|| {
                    FloodscopeError::StorageError(format!("endpoint '{}' has no host", endpoint))
                })?;
                let authority = match parsed.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                };
                let origin = format!("{}://{}", parsed.scheme(), authority);
                let path = format!("/{}/{}", self.bucket, uri_encode(key, false));
                Ok((origin, authority, path))
            }
            None => {
                let authority = format!("{}.s3.{}.amazonaws.com", self.bucket, self.region);
                Ok((
                    format!("https://{authority}"),
                    authority,
                    format!("/{}", uri_encode(key, false)),
                ))
            }
        }
    }

    fn presign(&self, method: &str, key: &str, expires_in: Duration) -> Result<String> {
        self.presign_at(method, key, expires_in, Utc::now())
    }

    /// SigV4 query presigning with an unsigned payload and `host` as the
    /// only signed header, which is what keeps uploads a plain PUT.
    fn presign_at(
        &self,
        method: &str,
        key: &str,
        expires_in: Duration,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let datestamp = now.format("%Y%m%d").to_string();
        let scope = format!("{datestamp}/{}/s3/aws4_request", self.region);
        let credential = format!("{}/{scope}", self.credentials.access_key);

        let (origin, authority, path) = self.addressing(key)?;

        // Already in canonical (sorted) order.
        let query = [
            ("X-Amz-Algorithm", "AWS4-HMAC-SHA256".to_string()),
            ("X-Amz-Credential", credential),
            ("X-Amz-Date", amz_date.clone()),
            ("X-Amz-Expires", expires_in.as_secs().to_string()),
            ("X-Amz-SignedHeaders", "host".to_string()),
        ];
        let canonical_query = query
            .iter()
            .map(|(name, value)| format!("{}={}", name, uri_encode(value, true)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_request = format!(
            "{method}\n{path}\n{canonical_query}\nhost:{authority}\n\nhost\nUNSIGNED-PAYLOAD"
        );
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let k_date = hmac(
            format!("AWS4{}", self.credentials.secret_key).as_bytes(),
            datestamp.as_bytes(),
        )?;
        let k_region = hmac(&k_date, self.region.as_bytes())?;
        let k_service = hmac(&k_region, b"s3")?;
        let k_signing = hmac(&k_service, b"aws4_request")?;
        let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes())?);

        Ok(format!(
            "{origin}{path}?{canonical_query}&X-Amz-Signature={signature}"
        ))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<StoredObject> {
        let bytes = tokio::fs::read(local_path).await?;
        let put_url = self.presign("PUT", key, self.upload_expiry)?;

        let response = self
            .client
            .put(&put_url)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FloodscopeError::StorageError(format!(
                "upload of '{}' rejected with {}: {}",
                key,
                status,
                body.trim()
            )));
        }

        let (origin, _, path) = self.addressing(key)?;
        info!(key, "artifact uploaded");
        Ok(StoredObject {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            url: format!("{origin}{path}"),
        })
    }
}

impl UrlSigner for S3Store {
    fn signed_url(&self, object: &StoredObject, expires_in: Duration) -> Result<String> {
        self.presign("GET", &object.key, expires_in)
    }
}

/// Storage key for an address: spaces become underscores, commas are
/// dropped, matching the layout existing artifacts already use.
pub fn object_key(prefix: &str, address: &str) -> String {
    format!("{prefix}/{}.png", address.replace(' ', "_").replace(',', ""))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| FloodscopeError::StorageError(format!("HMAC init failed: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// RFC 3986 encoding as SigV4 canonicalization wants it: unreserved bytes
/// kept, everything else percent-encoded uppercase, `/` kept only in paths.
fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| FloodscopeError::ConfigurationError(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store(endpoint: Option<&str>) -> S3Store {
        let config = StorageConfig {
            bucket: "flood-artifacts".to_string(),
            region: "ap-southeast-2".to_string(),
            endpoint: endpoint.map(str::to_string),
            key_prefix: "flood_maps".to_string(),
            presign_expiry_secs: 3600,
        };
        S3Store::new(
            &config,
            Credentials {
                access_key: "AKIAEXAMPLE".to_string(),
                secret_key: "secret".to_string(),
            },
        )
    }

    #[test]
    fn presigned_url_carries_sigv4_query() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let url = store(None)
            .presign_at("GET", "flood_maps/map.png", Duration::from_secs(600), now)
            .unwrap();

        assert!(url.starts_with(
            "https://flood-artifacts.s3.ap-southeast-2.amazonaws.com/flood_maps/map.png?"
        ));
        assert!(url.contains("X-Amz-Algorithm=AWS4-HMAC-SHA256"));
        assert!(url.contains(
            "X-Amz-Credential=AKIAEXAMPLE%2F20260806%2Fap-southeast-2%2Fs3%2Faws4_request"
        ));
        assert!(url.contains("X-Amz-Date=20260806T120000Z"));
        assert!(url.contains("X-Amz-Expires=600"));
        assert!(url.contains("X-Amz-SignedHeaders=host"));

        let signature = url.split("X-Amz-Signature=").nth(1).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn presigning_is_deterministic_for_fixed_inputs() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let store = store(None);
        let first = store
            .presign_at("GET", "flood_maps/map.png", Duration::from_secs(600), now)
            .unwrap();
        let second = store
            .presign_at("GET", "flood_maps/map.png", Duration::from_secs(600), now)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn endpoint_override_switches_to_path_style() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let url = store(Some("http://localhost:9000"))
            .presign_at("PUT", "flood_maps/map.png", Duration::from_secs(600), now)
            .unwrap();
        assert!(url.starts_with("http://localhost:9000/flood-artifacts/flood_maps/map.png?"));
    }

    #[test]
    fn object_key_strips_commas_and_spaces() {
        assert_eq!(
            object_key("flood_maps", "148-154 Jonson Street, Byron Bay NSW 2481"),
            "flood_maps/148-154_Jonson_Street_Byron_Bay_NSW_2481.png"
        );
    }
}
