pub const S3_AUTH_SCHEME: &str = "AWS";
pub const S3_DEFAULT_ENDPOINT: &str = "http://s3.amazonaws.com";
pub const S3_PUBLIC_URL_SCHEME: &str = "https";
pub const S3_DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const S3_COPY_CHUNK_SIZE: usize = 8192;
