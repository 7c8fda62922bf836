//! Content fingerprint for duplicate detection
//!
//! SHA-1 over the raw file bytes, read in fixed-size chunks so memory use does
//! not depend on file size. Used to spot identical content only.

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Uppercase hex SHA-1 of the file at `path` (40 characters)
///
/// The file is opened read-only and closed before returning, on error paths
/// as well.
pub fn fingerprint(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    fingerprint_reader(&mut file)
}

/// Uppercase hex SHA-1 of everything `reader` yields
pub fn fingerprint_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:X}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_known_digest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(
            fingerprint(file.path()).unwrap(),
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            fingerprint(file.path()).unwrap(),
            "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709"
        );
    }

    #[test]
    fn test_larger_than_one_chunk() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 13];
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        let streamed = fingerprint(file.path()).unwrap();
        assert_eq!(streamed, format!("{:X}", Sha1::digest(&data)));
        assert_eq!(streamed.len(), 40);
    }

    #[test]
    fn test_missing_file() {
        assert!(fingerprint(Path::new("/nonexistent/journal.docx")).is_err());
    }
}
