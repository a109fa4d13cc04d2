//! MinIO/S3-compatible photo store
//!
//! Writes go through the S3 API (rust-s3); removals are one signed
//! multi-object delete (`POST ?delete`) per batch. Reads go through the
//! public URL of each object, the same URL guests load in the gallery, so the
//! bucket gets an anonymous read policy on the public prefix at startup.

use async_trait::async_trait;
use base64::prelude::*;
use chrono::Utc;
use hmac::{Hmac, Mac};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Method, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::config::MinIOConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::ObjectStore;

type HmacSha256 = Hmac<Sha256>;

/// S3 accepts at most this many keys per multi-object delete
const MAX_DELETE_KEYS: usize = 1000;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    http_client: Client,
}

impl MinIOClient {
    /// Create a client, making sure the bucket exists and is publicly readable
    /// under the public prefix
    pub async fn new(config: MinIOConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket)
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        };

        client.ensure_bucket_exists().await;
        client.set_public_read_policy().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix
        );

        Ok(client)
    }

    /// Object key of a photo locator inside the bucket
    fn object_key(&self, path: &str) -> String {
        format!("{}/{}", self.public_prefix, path.trim_start_matches('/'))
    }

    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    /// Allow anonymous reads of `{bucket}/{public_prefix}/*`.
    ///
    /// Failure is logged, not fatal; the policy can be set by hand with
    /// `mc anonymous set download`.
    async fn set_public_read_policy(&self) {
        let bucket_name = self.bucket.name();
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": {"AWS": "*"},
                    "Action": ["s3:GetObject"],
                    "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket_name, self.public_prefix)]
                }
            ]
        })
        .to_string();

        match self.put_bucket_policy(&bucket_name, &policy).await {
            Ok(()) => info!(
                "Set public read policy for {}/{}/*",
                bucket_name, self.public_prefix
            ),
            Err(e) => warn!(
                "Failed to set bucket policy for '{}': {}. \
                Set it manually with: mc anonymous set download minio/{}/{}",
                bucket_name, e, bucket_name, self.public_prefix
            ),
        }
    }

    /// PUT ?policy (rust-s3 has no policy API)
    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<()> {
        let response = self
            .send_signed(
                bucket_name,
                Method::PUT,
                "policy",
                policy.to_string(),
                "application/json",
                Vec::new(),
            )
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(AppError::Storage(format!(
            "Failed to set bucket policy: {} - {}",
            status, body
        )))
    }

    /// Send a bucket sub-resource request (`?policy`, `?delete`) signed with
    /// AWS Signature v4. rust-s3 exposes neither.
    ///
    /// `extra_headers` are lowercase `x-amz-*` headers; they are signed too.
    async fn send_signed(
        &self,
        bucket_name: &str,
        method: Method,
        subresource: &str,
        body: String,
        content_type: &str,
        extra_headers: Vec<(&'static str, String)>,
    ) -> Result<reqwest::Response> {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let url = format!("{}/{}?{}", self.endpoint, bucket_name, subresource);
        let payload_hash = hex::encode(Sha256::digest(body.as_bytes()));

        let mut headers = vec![
            ("host", host_header),
            ("x-amz-content-sha256", payload_hash.clone()),
            ("x-amz-date", amz_date.clone()),
        ];
        headers.extend(extra_headers);
        headers.sort_by(|a, b| a.0.cmp(b.0));

        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let signed_headers = headers
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(";");
        let canonical_request = format!(
            "{}\n/{}\n{}=\n{}\n{}\n{}",
            method, bucket_name, subresource, canonical_headers, signed_headers, payload_hash
        );

        let algorithm = "AWS4-HMAC-SHA256";
        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            algorithm,
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.signature(&date_stamp, &string_to_sign)?;
        let authorization_header = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            algorithm, self.access_key, credential_scope, signed_headers, signature
        );

        let mut request = self.http_client.request(method, &url);
        for (name, value) in &headers {
            request = request.header(*name, value);
        }

        request
            .header("Authorization", &authorization_header)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to send ?{} request: {}", subresource, e)))
    }

    fn signature(&self, date_stamp: &str, string_to_sign: &str) -> Result<String> {
        let k_date = Self::hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = Self::hmac_sha256(&k_date, self.region_name.as_bytes())?;
        let k_service = Self::hmac_sha256(&k_region, b"s3")?;
        let k_signing = Self::hmac_sha256(&k_service, b"aws4_request")?;

        Ok(hex::encode(Self::hmac_sha256(
            &k_signing,
            string_to_sign.as_bytes(),
        )?))
    }

    fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn check_status(action: &str, key: &str, status: u16) -> Result<()> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(AppError::Storage(format!(
                "Failed to {} '{}': HTTP {}",
                action, key, status
            )))
        }
    }
}

#[async_trait]
impl ObjectStore for MinIOClient {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let key = self.object_key(path);
        let response = self
            .bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;
        Self::check_status("upload", &key, response.status_code())?;

        debug!("Uploaded '{}' ({} bytes)", key, data.len());
        Ok(())
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.public_url(path);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to fetch '{}': {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Storage(format!(
                "Failed to fetch '{}': HTTP {}",
                path, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read '{}': {}", path, e)))?;

        debug!("Fetched '{}' ({} bytes)", path, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        let keys: Vec<String> = paths.iter().map(|path| self.object_key(path)).collect();
        let bucket_name = self.bucket.name();

        for chunk in keys.chunks(MAX_DELETE_KEYS) {
            let body = delete_request_body(chunk);
            let checksum = BASE64_STANDARD.encode(Sha256::digest(body.as_bytes()));
            let response = self
                .send_signed(
                    &bucket_name,
                    Method::POST,
                    "delete",
                    body,
                    "application/xml",
                    vec![("x-amz-checksum-sha256", checksum)],
                )
                .await?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| AppError::Storage(format!("Failed to read delete result: {}", e)))?;
            if !status.is_success() {
                return Err(AppError::Storage(format!(
                    "Failed to delete {} objects: {} - {}",
                    chunk.len(),
                    status,
                    text
                )));
            }

            let failed = parse_delete_errors(&text)?;
            if let Some(first) = failed.first() {
                return Err(AppError::Storage(format!(
                    "Failed to delete '{}': {} ({} of {} objects failed)",
                    first.key,
                    first.code,
                    failed.len(),
                    chunk.len()
                )));
            }
            debug!("Deleted {} objects", chunk.len());
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        let encoded = self
            .object_key(path)
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), encoded)
    }
}

/// `<Delete>` document in quiet mode, so the reply lists only failed keys
fn delete_request_body(keys: &[String]) -> String {
    let objects: String = keys
        .iter()
        .map(|key| format!("<Object><Key>{}</Key></Object>", escape(key.as_str())))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Delete><Quiet>true</Quiet>{}</Delete>",
        objects
    )
}

#[derive(Debug, Default, PartialEq)]
struct DeleteError {
    key: String,
    code: String,
}

/// Collect the `<Error>` entries of a `<DeleteResult>`
fn parse_delete_errors(xml: &str) -> Result<Vec<DeleteError>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut errors = Vec::new();
    let mut current: Option<DeleteError> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "Error" {
                    current = Some(DeleteError::default());
                } else if current.is_some() {
                    field = Some(name);
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(error), Some(name)) = (current.as_mut(), field.as_deref()) {
                    let text = e
                        .unescape()
                        .map_err(|e| AppError::Storage(format!("Malformed delete result: {}", e)))?
                        .to_string();
                    match name {
                        "Key" => error.key = text,
                        "Code" => error.code = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"Error" {
                    errors.extend(current.take());
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Malformed delete result: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(errors)
}
