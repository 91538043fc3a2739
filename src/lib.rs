pub mod error;
pub mod s3_bucket;
pub mod s3_client;
pub mod s3_constant;
pub mod s3_resource;
pub mod s3_signer;

pub use error::*;
pub use s3_bucket::*;
pub use s3_client::*;
pub use s3_constant::*;
pub use s3_resource::*;
pub use s3_signer::*;
