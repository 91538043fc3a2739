use std::fmt;
use std::io::{self, Read};

/// A fetched object: its resolved bucket-relative path plus the content
/// stream. The stream is single-pass and single-consumer; drain it or drop
/// the resource to release the underlying response.
pub struct ObjectResource {
    path: String,
    content: Box<dyn Read + Send>,
}

impl ObjectResource {
    #[inline]
    pub(crate) fn new(path: String, content: Box<dyn Read + Send>) -> Self {
        Self { path, content }
    }

    /// Full `bucketName/path` the object was resolved at.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Convenience drain of the whole stream.
    pub fn read_to_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.content.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl Read for ObjectResource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.content.read(buf)
    }
}

impl fmt::Debug for ObjectResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectResource")
            .field("path", &self.path)
            .finish()
    }
}
