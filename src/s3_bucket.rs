use std::fmt;
use std::io::{self, Read};

use reqwest::blocking::Body;
use reqwest::{Method, StatusCode};

use crate::error::Error;
use crate::s3_client::{Payload, S3Client};
use crate::s3_constant::{S3_COPY_CHUNK_SIZE, S3_PUBLIC_URL_SCHEME};
use crate::s3_resource::ObjectResource;

/// A named namespace over a shared client. Does not own the client; any
/// number of buckets may borrow the same one.
pub struct Bucket<'c> {
    client: &'c S3Client,
    name: String,
}

impl<'c> Bucket<'c> {
    /// Name is normalized once here: leading and trailing `/` are trimmed,
    /// so `"/name/"` and `"name"` address the same bucket.
    #[inline]
    pub fn new(client: &'c S3Client, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim_matches('/').to_string();
        Self { client, name }
    }

    #[inline]
    pub fn client(&self) -> &S3Client {
        self.client
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch one object. 404 maps to `NotFound` with the fully-qualified
    /// path; any other non-200 surfaces the store's status and body.
    pub fn get(&self, path: &str) -> Result<ObjectResource, Error> {
        let full_path = self.full_path(path)?;
        let response = self.client.request(Method::GET, &full_path, Payload::None)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound(full_path)),
            StatusCode::OK => Ok(ObjectResource::new(full_path, response.into_reader())),
            status => Err(Error::Store {
                status: status.as_u16(),
                body: response.text(),
            }),
        }
    }

    /// Fetch the first candidate that exists, in the given order. Only
    /// `NotFound` means "try the next one"; any other error propagates
    /// immediately. When every candidate is missing, the error lists all
    /// attempted paths.
    pub fn get_first<I, S>(&self, paths: I) -> Result<ObjectResource, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_string()).collect();
        for path in &paths {
            match self.get(path) {
                Ok(resource) => return Ok(resource),
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(Error::NotFound(paths.join(", ")))
    }

    /// Store an object, streaming `data` to the request in 8 KiB chunks so
    /// memory stays bounded regardless of object size. The source is
    /// released on every exit path. Returns the object's public URL.
    pub fn put(&self, path: &str, data: impl Read + Send + 'static) -> Result<String, Error> {
        let full_path = self.full_path(path)?;
        let content_type = (self.client.mime_lookup())(&full_path);
        let body = Body::new(ChunkedSource::new(data));

        let response = self.client.request(
            Method::PUT,
            &full_path,
            Payload::Stream { body, content_type },
        )?;
        match response.status() {
            StatusCode::OK => Ok(format!(
                "{scheme}://{host}/{path}",
                scheme = S3_PUBLIC_URL_SCHEME,
                host = self.client.public_host(),
                path = full_path,
            )),
            status => Err(Error::Store {
                status: status.as_u16(),
                body: response.text(),
            }),
        }
    }

    /// `bucketName/path`, with one leading `/` on the object path forgiven.
    fn full_path(&self, path: &str) -> Result<String, Error> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if path.is_empty() {
            return Err(Error::InvalidArgument("empty object path".to_string()));
        }
        Ok(format!("{}/{}", self.name, path))
    }
}

impl fmt::Display for Bucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Bucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket").field("name", &self.name).finish()
    }
}

/// Caps every read at the copy chunk size so the transport moves the upload
/// incrementally. Dropping the body drops the source, on success and on
/// failure alike.
struct ChunkedSource<R> {
    source: R,
}

impl<R> ChunkedSource<R> {
    fn new(source: R) -> Self {
        Self { source }
    }
}

impl<R: Read> Read for ChunkedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let cap = buf.len().min(S3_COPY_CHUNK_SIZE);
        self.source.read(&mut buf[..cap])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> S3Client {
        S3Client::bypass()
    }

    #[test]
    fn name_normalization_trims_slashes() {
        let client = client();
        assert_eq!(Bucket::new(&client, "name").name(), "name");
        assert_eq!(Bucket::new(&client, "/name").name(), "name");
        assert_eq!(Bucket::new(&client, "name/").name(), "name");
        assert_eq!(Bucket::new(&client, "/name/").name(), "name");
        assert_eq!(Bucket::new(&client, "name").to_string(), "name");
    }

    #[test]
    fn full_path_forgives_one_leading_slash() {
        let client = client();
        let bucket = Bucket::new(&client, "pictures");
        assert_eq!(bucket.full_path("a/b.jpg").unwrap(), "pictures/a/b.jpg");
        assert_eq!(bucket.full_path("/a/b.jpg").unwrap(), "pictures/a/b.jpg");
    }

    #[test]
    fn empty_path_is_rejected_before_any_request() {
        let client = client();
        let bucket = Bucket::new(&client, "pictures");
        assert!(matches!(
            bucket.get("").unwrap_err(),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            bucket.get("/").unwrap_err(),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            bucket.put("", std::io::empty()).unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn chunked_source_caps_each_read() {
        let data = vec![7u8; S3_COPY_CHUNK_SIZE * 2 + 1];
        let mut source = ChunkedSource::new(io::Cursor::new(data));
        let mut buf = vec![0u8; S3_COPY_CHUNK_SIZE * 4];
        assert_eq!(source.read(&mut buf).unwrap(), S3_COPY_CHUNK_SIZE);
        assert_eq!(source.read(&mut buf).unwrap(), S3_COPY_CHUNK_SIZE);
        assert_eq!(source.read(&mut buf).unwrap(), 1);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }
}
