use std::fmt;
use std::io::{self, Read};

use chrono::Utc;
use log::debug;
use reqwest::blocking::{Body, Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::{Method, StatusCode, Url};

use crate::error::Error;
use crate::s3_bucket::Bucket;
use crate::s3_constant::{S3_DEFAULT_CONTENT_TYPE, S3_DEFAULT_ENDPOINT};
use crate::s3_signer::{http_date, url_encode, Signer};

/// Access-key pair for the store. The secret never leaves the process and is
/// redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    #[inline]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    #[inline]
    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Selected once at construction. `Bypass` short-circuits every request to a
/// synthetic success without signing or touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Bypass,
}

/// Content-type lookup used for `put`, keyed by the object path. Injected so
/// the client core carries no ambient lookup table.
pub type MimeLookup = fn(&str) -> String;

/// Default lookup: guess from the filename extension, fall back to a generic
/// octet type.
pub fn guess_content_type(path: &str) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(S3_DEFAULT_CONTENT_TYPE)
        .to_string()
}

#[derive(Debug, Clone)]
pub struct S3Client {
    credentials: Credentials,
    endpoint: Url,
    mode: Mode,
    http: Client,
    mime_lookup: MimeLookup,
}

impl S3Client {
    /// Live client against the default endpoint with its own transport.
    #[inline]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(Client::new(), credentials)
    }

    /// Live client reusing a caller-supplied transport.
    #[inline]
    pub fn with_transport(http: Client, credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: Url::parse(S3_DEFAULT_ENDPOINT).unwrap(),
            mode: Mode::Live,
            http,
            mime_lookup: guess_content_type,
        }
    }

    /// Client that never contacts the network: every request yields a
    /// synthetic 200 with an empty body. For tests and offline runs.
    #[inline]
    pub fn bypass() -> Self {
        let mut client = Self::new(Credentials::new("", ""));
        client.mode = Mode::Bypass;
        client
    }

    /// Replace the store endpoint, e.g. `http://127.0.0.1:9000`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, Error> {
        self.endpoint = Url::parse(endpoint)
            .map_err(|e| Error::InvalidArgument(format!("endpoint {}: {}", endpoint, e)))?;
        Ok(self)
    }

    /// Replace the content-type lookup used by `put`.
    #[inline]
    pub fn with_mime_lookup(mut self, mime_lookup: MimeLookup) -> Self {
        self.mime_lookup = mime_lookup;
        self
    }

    #[inline]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn bucket(&self, name: impl Into<String>) -> Bucket<'_> {
        Bucket::new(self, name)
    }

    #[inline]
    pub(crate) fn mime_lookup(&self) -> MimeLookup {
        self.mime_lookup
    }

    /// Host rendered into public object URLs, port included when present.
    pub(crate) fn public_host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// One signed HTTP exchange. Returns the raw response; status
    /// interpretation belongs to the caller.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<StoreResponse, Error> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        debug!("{} {}", method, path);

        if self.mode == Mode::Bypass {
            return Ok(StoreResponse::bypassed());
        }

        // One timestamp for both the Date header and the signing input; the
        // two must be byte-identical or the store rejects the request.
        let date = http_date(Utc::now());
        let authorization = Signer::new(&self.credentials).authorization(
            method.as_str(),
            &path,
            payload.content_type(),
            &date,
        )?;

        let url = self.resource_url(&path)?;
        let mut builder = self
            .http
            .request(method, url)
            .header(DATE, &date)
            .header(AUTHORIZATION, authorization);
        if let Payload::Stream { body, content_type } = payload {
            builder = builder.header(CONTENT_TYPE, content_type).body(body);
        }

        Ok(StoreResponse::live(builder.send()?))
    }

    fn resource_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let target = format!("{}{}", base, url_encode(path, true));
        Url::parse(&target).map_err(|e| Error::InvalidArgument(format!("url {}: {}", target, e)))
    }
}

/// Request body handed down from `Bucket::put`. `None` for GET.
pub(crate) enum Payload {
    None,
    Stream { body: Body, content_type: String },
}

impl Payload {
    fn content_type(&self) -> Option<&str> {
        match self {
            Payload::None => None,
            Payload::Stream { content_type, .. } => Some(content_type),
        }
    }
}

/// Raw outcome of one exchange: status plus an optional live body. Bypass
/// responses carry 200 and an empty stream.
pub struct StoreResponse {
    status: StatusCode,
    body: Option<Response>,
}

impl StoreResponse {
    fn live(response: Response) -> Self {
        Self {
            status: response.status(),
            body: Some(response),
        }
    }

    fn bypassed() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Drain the body to text for diagnostics. Best effort: read failures
    /// yield an empty string rather than masking the original status.
    pub fn text(self) -> String {
        match self.body {
            Some(response) => response.text().unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Single-pass content stream, handed to the caller unconsumed.
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        match self.body {
            Some(response) => Box::new(response),
            None => Box::new(io::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret_key() {
        let creds = Credentials::new("AKID", "super-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("AKID"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn bypass_mode_is_set_at_construction() {
        assert_eq!(S3Client::bypass().mode(), Mode::Bypass);
        assert_eq!(S3Client::new(Credentials::new("a", "s")).mode(), Mode::Live);
    }

    #[test]
    fn endpoint_must_parse() {
        let err = S3Client::bypass().with_endpoint("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn public_host_keeps_port() {
        let client = S3Client::bypass()
            .with_endpoint("http://127.0.0.1:9000")
            .unwrap();
        assert_eq!(client.public_host(), "127.0.0.1:9000");

        let client = S3Client::bypass()
            .with_endpoint("http://s3.amazonaws.com")
            .unwrap();
        assert_eq!(client.public_host(), "s3.amazonaws.com");
    }

    #[test]
    fn default_content_type_lookup() {
        assert_eq!(guess_content_type("a/b/photo.jpg"), "image/jpeg");
        assert_eq!(guess_content_type("notes.txt"), "text/plain");
        assert_eq!(guess_content_type("blob.unknown-ext"), "application/octet-stream");
    }
}
