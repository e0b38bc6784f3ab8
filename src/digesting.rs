//! Streaming multi-algorithm hashing.
//!
//! A file is read once; every requested algorithm sees the same buffer.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use digest::DynDigest;

use crate::algorithm::{DigestValue, HashAlgorithm};
use crate::known::DigestSet;

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Size and digests of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub size: u64,
    pub digests: DigestSet,
}

enum Hasher {
    RustCrypto(Box<dyn DynDigest>),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Hasher::RustCrypto(Box::new(md5::Md5::default())),
            HashAlgorithm::Sha1 => Hasher::RustCrypto(Box::new(sha1::Sha1::default())),
            HashAlgorithm::Sha256 => Hasher::RustCrypto(Box::new(sha2::Sha256::default())),
            HashAlgorithm::Tiger => Hasher::RustCrypto(Box::new(tiger::Tiger::default())),
            HashAlgorithm::Whirlpool => {
                Hasher::RustCrypto(Box::new(whirlpool::Whirlpool::default()))
            }
            HashAlgorithm::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Hasher::RustCrypto(hasher) => hasher.update(bytes),
            Hasher::Blake3(hasher) => {
                hasher.update(bytes);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Hasher::RustCrypto(hasher) => hasher
                .finalize()
                .iter()
                .map(|byte| format!("{byte:02x}"))
                .collect(),
            Hasher::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
        }
    }
}

/// Hash everything `reader` yields under each of `algorithms`.
pub fn digest_reader(
    mut reader: impl Read,
    algorithms: &[HashAlgorithm],
) -> io::Result<FileDigests> {
    let mut hashers: Vec<(HashAlgorithm, Hasher)> = algorithms
        .iter()
        .map(|algorithm| (*algorithm, Hasher::new(*algorithm)))
        .collect();
    let mut buffer = vec![0u8; READ_BUFFER_BYTES];
    let mut size = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        size += read as u64;
        for (_, hasher) in &mut hashers {
            hasher.update(&buffer[..read]);
        }
    }
    let digests = hashers
        .into_iter()
        .filter_map(|(algorithm, hasher)| {
            DigestValue::new(&hasher.finalize_hex()).map(|value| (algorithm, value))
        })
        .collect();
    Ok(FileDigests { size, digests })
}

/// Open and hash a file.
pub fn digest_file(path: &Path, algorithms: &[HashAlgorithm]) -> io::Result<FileDigests> {
    let file = fs::File::open(path)?;
    digest_reader(file, algorithms)
}
