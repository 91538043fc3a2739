use std::io::Cursor;

use simple_s3_bucket::{Error, Mode, S3Client};

// A bypass client never signs and never dials the store: every operation
// succeeds synthetically. Useful for test suites and offline development.
fn main() -> Result<(), Error> {
    let client = S3Client::bypass();
    assert_eq!(client.mode(), Mode::Bypass);

    let bucket = client.bucket("examplebucket");
    let url = bucket.put("any/key.bin", Cursor::new(vec![0u8; 16]))?;
    println!("pretend-stored at {}", url);

    let resource = bucket.get("any/key.bin")?;
    println!("pretend-fetched {} (empty stream)", resource.path());

    Ok(())
}
