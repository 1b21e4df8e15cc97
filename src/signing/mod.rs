//! HMAC request signing.
//!
//! Every request is authenticated by signing a canonical string built from its
//! `Date` header, its request line and, when present, its `Content-MD5` header:
//!
//! ```text
//! Date: Fri, 11 Jul 2014 07:16:51 GMT
//! POST /v1/messages HTTP/1.1
//! ```
//!
//! The HMAC-SHA1 digest of that string, keyed by the API secret, is sent in the
//! `Authorization` header together with the API key and the list of signed
//! headers.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::{debug, trace};

use crate::domain::Credentials;

pub const DATE_HEADER: &str = "Date";
pub const CONTENT_MD5_HEADER: &str = "Content-MD5";

const HTTP_VERSION: &str = "HTTP/1.1";
const ALGORITHM: &str = "hmac-sha1";

/// Header values that take part in a request signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignableRequest<'a> {
    pub date: &'a str,
    pub method: &'a str,
    /// Path including the query string, e.g. `/v1/messages?limit=1`.
    pub path_and_query: &'a str,
    pub content_md5: Option<&'a str>,
}

impl SignableRequest<'_> {
    pub fn request_line(&self) -> String {
        format!("{} {} {HTTP_VERSION}", self.method, self.path_and_query)
    }

    /// Exact text fed to the HMAC. Lines are joined by `\n` without a trailing newline.
    pub fn signing_string(&self) -> String {
        let mut value = format!("{DATE_HEADER}: {}\n{}", self.date, self.request_line());
        if let Some(content_md5) = self.content_md5 {
            value.push('\n');
            value.push_str(CONTENT_MD5_HEADER);
            value.push_str(": ");
            value.push_str(content_md5);
        }
        value
    }

    pub fn signed_headers(&self) -> &'static str {
        if self.content_md5.is_some() {
            "Date request-line content-md5"
        } else {
            "Date request-line"
        }
    }
}

/// Base64 encoded HMAC with SHA1 hash.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(content);

    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the `Authorization` header value for `request`.
pub fn authorization_header(credentials: &Credentials, request: &SignableRequest<'_>) -> String {
    let string_to_sign = request.signing_string();
    debug!("string to sign: {}", string_to_sign);

    let signature = base64_hmac_sha1(
        credentials.secret().as_str().as_bytes(),
        string_to_sign.as_bytes(),
    );
    let header = format!(
        "hmac username=\"{}\", algorithm=\"{ALGORITHM}\", headers=\"{}\", signature=\"{signature}\"",
        credentials.key().as_str(),
        request.signed_headers(),
    );
    trace!(headers = request.signed_headers(), "signed request");
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("123", "456").unwrap()
    }

    fn request(content_md5: Option<&'static str>) -> SignableRequest<'static> {
        SignableRequest {
            date: "Fri, 11 Jul 2014 07:16:51 GMT",
            method: "POST",
            path_and_query: "/v1/messages",
            content_md5,
        }
    }

    #[test]
    fn signing_string_without_content_hash() {
        assert_eq!(
            request(None).signing_string(),
            "Date: Fri, 11 Jul 2014 07:16:51 GMT\nPOST /v1/messages HTTP/1.1"
        );
    }

    #[test]
    fn signing_string_with_content_hash() {
        let request = request(Some("1B2M2Y8AsgTpgAmY7PhCfg=="));
        assert_eq!(
            request.signing_string(),
            "Date: Fri, 11 Jul 2014 07:16:51 GMT\nPOST /v1/messages HTTP/1.1\nContent-MD5: 1B2M2Y8AsgTpgAmY7PhCfg=="
        );
        assert_eq!(request.signed_headers(), "Date request-line content-md5");
    }

    #[test]
    fn authorization_header_matches_known_signature() {
        assert_eq!(
            authorization_header(&credentials(), &request(None)),
            "hmac username=\"123\", algorithm=\"hmac-sha1\", headers=\"Date request-line\", signature=\"bUAvEbDgutL51S3dmtpFp5ONgy0=\""
        );
    }

    #[test]
    fn signature_depends_on_request_line() {
        let mut get = request(None);
        get.method = "GET";
        assert_ne!(
            authorization_header(&credentials(), &get),
            authorization_header(&credentials(), &request(None))
        );
    }

    #[test]
    fn hmac_sha1_reference_value() {
        // RFC 2202 test case 2.
        assert_eq!(
            base64_hmac_sha1(b"Jefe", b"what do ya want for nothing?"),
            "7/zfauXrL6LSdBbV8YTfnCWafHk="
        );
    }
}
