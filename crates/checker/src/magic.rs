use crate::FormatKind;
use crate::error::{Error, ErrorKind};
use std::str::FromStr;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
const SNAPPY_MAGIC: [u8; 4] = [0xFF, 0x06, 0x00, 0x00];
const PARQUET_MAGIC: [u8; 4] = *b"PAR1";
const AVRO_MAGIC: [u8; 4] = [b'O', b'b', b'j', 0x01];
const SEVEN_ZIP_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];
const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];
const XZ_MAGIC: [u8; 6] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const RAR_MAGIC: [u8; 7] = [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00];

/// Length of the longest known signature, and therefore the number of
/// leading bytes a [`ReadChecker`](crate::ReadChecker) peeks at.
pub const MAX_MAGIC_LEN: usize = RAR_MAGIC.len();

/// Known signatures in lookup order. No signature is a prefix of another, so
/// the order never changes the outcome.
pub(crate) const SIGNATURES: [(&[u8], FormatKind); 10] = [
    (&GZIP_MAGIC, FormatKind::Gzip),
    (&ZIP_MAGIC, FormatKind::Zip),
    (&ZSTD_MAGIC, FormatKind::Zstd),
    (&SNAPPY_MAGIC, FormatKind::Snappy),
    (&PARQUET_MAGIC, FormatKind::Parquet),
    (&AVRO_MAGIC, FormatKind::Avro),
    (&SEVEN_ZIP_MAGIC, FormatKind::SevenZip),
    (&BZIP2_MAGIC, FormatKind::BZip2),
    (&XZ_MAGIC, FormatKind::Xz),
    (&RAR_MAGIC, FormatKind::Rar),
];

impl FromStr for FormatKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(FormatKind::None),
            "snappy" | "sz" => Ok(FormatKind::Snappy),
            "gzip" | "gz" => Ok(FormatKind::Gzip),
            "zstd" | "zst" => Ok(FormatKind::Zstd),
            "zip" => Ok(FormatKind::Zip),
            "parquet" => Ok(FormatKind::Parquet),
            "avro" => Ok(FormatKind::Avro),
            "7z" | "7zip" | "sevenzip" => Ok(FormatKind::SevenZip),
            "bzip2" | "bz2" => Ok(FormatKind::BZip2),
            "xz" | "lzma" => Ok(FormatKind::Xz),
            "rar" => Ok(FormatKind::Rar),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}
impl From<&[u8]> for FormatKind {
    fn from(value: &[u8]) -> Self {
        FormatKind::from_magic_bytes(value)
    }
}
impl FormatKind {
    /// Detect a format from the leading bytes of some data.
    ///
    /// Returns the `None` variant if no signature matches or if the input
    /// is too short to hold any signature. Never reads past
    /// [`MAX_MAGIC_LEN`] bytes and never modifies the input.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        SIGNATURES
            .iter()
            .find(|(magic, _)| bytes.starts_with(magic))
            .map(|(_, kind)| *kind)
            .unwrap_or(FormatKind::None)
    }

    /// The signature that identifies this format, or an empty slice for
    /// [`None`](Self::None).
    #[must_use]
    pub fn magic_bytes(&self) -> &'static [u8] {
        SIGNATURES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(magic, _)| *magic)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("none", FormatKind::None)]
    #[case("snappy", FormatKind::Snappy)]
    #[case("gz", FormatKind::Gzip)]
    #[case("GZIP", FormatKind::Gzip)]
    #[case("zst", FormatKind::Zstd)]
    #[case("zip", FormatKind::Zip)]
    #[case("Parquet", FormatKind::Parquet)]
    #[case("avro", FormatKind::Avro)]
    #[case("7z", FormatKind::SevenZip)]
    #[case("7zip", FormatKind::SevenZip)]
    #[case("bz2", FormatKind::BZip2)]
    #[case("Bzip2", FormatKind::BZip2)]
    #[case("xz", FormatKind::Xz)]
    #[case("lzma", FormatKind::Xz)]
    #[case("rar", FormatKind::Rar)]
    fn test_from_str(#[case] test: &str, #[case] expected: FormatKind) {
        assert_eq!(test.parse::<FormatKind>().unwrap(), expected);
    }

    #[rstest]
    #[case("invalid")]
    #[case("lz4")]
    #[case(" ")]
    fn test_from_str_invalid(#[case] test: &str) {
        let err = test.parse::<FormatKind>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(name) if name == test));
    }

    #[rstest]
    #[case(b"<!DOCTYPE html>", FormatKind::None)]
    #[case(b"", FormatKind::None)]
    #[case(b"a", FormatKind::None)]
    #[case(&[0x1F], FormatKind::None)]
    #[case(&[0x1F, 0x8B], FormatKind::Gzip)]
    #[case(&[0x1F, 0x8B, 0x08, 0x00], FormatKind::Gzip)]
    #[case(&[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00], FormatKind::Zip)]
    #[case(&[0x50, 0x4B, 0x05, 0x06], FormatKind::None)]
    #[case(&[0x28, 0xB5, 0x2F, 0xFD], FormatKind::Zstd)]
    #[case(&[0xFF, 0x06, 0x00, 0x00, 0x73, 0x4E, 0x61], FormatKind::Snappy)]
    #[case(b"PAR1\x15\x04", FormatKind::Parquet)]
    #[case(b"PAR", FormatKind::None)]
    #[case(b"Obj\x01\x04\x14", FormatKind::Avro)]
    #[case(b"Obj\x02", FormatKind::None)]
    #[case(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0x00, 0x04], FormatKind::SevenZip)]
    #[case(&[0x37, 0x7A, 0xBC, 0xAF, 0x27], FormatKind::None)]
    #[case(b"BZh91AY&SY", FormatKind::BZip2)]
    #[case(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, 0x00], FormatKind::Xz)]
    #[case(&[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00], FormatKind::Rar)]
    #[case(&[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x01, 0x00], FormatKind::None)]
    fn test_from_magic_bytes(#[case] bytes: &[u8], #[case] expected: FormatKind) {
        assert_eq!(FormatKind::from_magic_bytes(bytes), expected);
        assert_eq!(<&[u8] as Into<FormatKind>>::into(bytes), expected);
    }

    #[test]
    fn test_every_signature_matches_with_any_continuation() {
        let tails: [&[u8]; 4] = [b"", b"\x00", b"trailing data", &[0xFF; 32]];
        for (magic, kind) in SIGNATURES {
            for tail in tails {
                let data = [magic, tail].concat();
                assert_eq!(FormatKind::from_magic_bytes(&data), kind, "{kind} with tail {tail:?}");
            }
        }
    }

    #[test]
    fn test_signature_prefixes_do_not_match() {
        for (magic, kind) in SIGNATURES {
            let truncated = &magic[..magic.len() - 1];
            assert_ne!(FormatKind::from_magic_bytes(truncated), kind);
        }
    }

    #[test]
    fn test_signatures_are_unambiguous() {
        for (i, (a, _)) in SIGNATURES.iter().enumerate() {
            for (b, _) in SIGNATURES.iter().skip(i + 1) {
                assert!(!a.starts_with(b) && !b.starts_with(a), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_max_magic_len() {
        assert_eq!(MAX_MAGIC_LEN, 7);
        assert!(SIGNATURES.iter().all(|(magic, _)| magic.len() <= MAX_MAGIC_LEN));
    }

    #[test]
    fn test_magic_bytes_roundtrip() {
        assert!(FormatKind::None.magic_bytes().is_empty());
        for kind in FormatKind::ALL.into_iter().filter(FormatKind::is_compressed) {
            assert_eq!(FormatKind::from_magic_bytes(kind.magic_bytes()), kind);
        }
    }

    #[test]
    fn test_from_magic_bytes_is_deterministic() {
        let data = b"\x1F\x8B\x08 payload".to_vec();
        let before = data.clone();
        assert_eq!(FormatKind::from_magic_bytes(&data), FormatKind::from_magic_bytes(&data));
        assert_eq!(data, before);
    }
}
