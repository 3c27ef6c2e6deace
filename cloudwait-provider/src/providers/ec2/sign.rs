//! AWS Signature Version 4
//!
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html>

use sha2::{Digest, Sha256};

use crate::providers::common::hmac_sha256;
use crate::utils::log_sanitizer::truncate_for_log;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// One request to be signed.
pub(crate) struct SigningRequest<'a> {
    pub method: &'a str,
    /// `Host` header value, port included when non-default.
    pub host: &'a str,
    /// Canonical URI, already `/`-terminated.
    pub path: &'a str,
    /// Already canonical (encoded and sorted) query string.
    pub query: &'a str,
    /// `X-Amz-Date` value, `%Y%m%dT%H%M%SZ`.
    pub amz_date: &'a str,
    pub session_token: Option<&'a str>,
    /// Hex SHA256 of the body.
    pub payload_hash: &'a str,
}

/// Region and service the signature is scoped to.
pub(crate) struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
}

/// RFC3986-encodes and sorts query parameters.
pub(crate) fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Derives the SigV4 signing key.
pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Builds the `Authorization` header value for a request.
pub(crate) fn authorization(
    request: &SigningRequest<'_>,
    scope: &SigningScope<'_>,
    access_key_id: &str,
    secret_access_key: &str,
) -> String {
    // 1. Canonical headers (already lower-case and sorted)
    let mut headers = vec![("host", request.host), ("x-amz-date", request.amz_date)];
    if let Some(token) = request.session_token {
        headers.push(("x-amz-security-token", token));
    }
    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{k}:{}\n", v.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(k, _)| *k)
        .collect::<Vec<_>>()
        .join(";");

    // 2. Canonical request
    let canonical_request = format!(
        "{}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{}",
        request.method, request.path, request.query, request.payload_hash
    );
    log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

    // 3. String to sign
    let date = request.amz_date.get(..8).unwrap_or(request.amz_date);
    let credential_scope = format!(
        "{date}/{}/{}/aws4_request",
        scope.region, scope.service
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{}\n{credential_scope}\n{}",
        request.amz_date,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );
    log::debug!("StringToSign:\n{string_to_sign}");

    // 4. Signature
    let key = signing_key(secret_access_key, date, scope.region, scope.service);
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={access_key_id}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}"
    )
}
