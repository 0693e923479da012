use core::fmt::{self, Write as _};

use heapless::{String, Vec};

use crate::{Error, MAX_PAYLOAD_LEN, MAX_UID_HEX_LEN, UID_TRAILER_LEN};

/// Identifier of an ISO/IEC 14443-A tag, kept both raw and as uppercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagId {
    bytes: Vec<u8, MAX_PAYLOAD_LEN>,
    hex: String<MAX_UID_HEX_LEN>,
}

impl TagId {
    /// Builds an identifier from raw UID bytes.
    pub fn from_bytes(uid: &[u8]) -> Result<TagId, Error> {
        let bytes = Vec::from_slice(uid).map_err(|_| Error::InvalidResponse)?;
        let mut hex = String::new();
        for b in uid {
            write!(hex, "{:02X}", b).map_err(|_| Error::InvalidResponse)?;
        }
        Ok(TagId { bytes, hex })
    }

    /// Extracts the UID from an anticollision reply payload.
    ///
    /// The UID sits between the leading byte and the trailing check bytes, so
    /// bytes `1 .. len - 3` are taken. A reply too short for that range still
    /// comes from a tag and yields an empty identifier.
    pub fn from_anticollision(data: &[u8]) -> Result<TagId, Error> {
        let end = data.len().saturating_sub(UID_TRAILER_LEN);
        TagId::from_bytes(data.get(1..end).unwrap_or_default())
    }

    /// The raw UID bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the tag answered without any UID bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The identifier as uppercase hexadecimal, two characters per byte.
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_uid_between_header_and_trailer() {
        let data = [0x00, 0xAB, 0xCD, 0xEF, 0x01, 0x02, 0x03];
        let tag = TagId::from_anticollision(&data).unwrap();

        assert_eq!(tag.as_str(), "ABCDEF");
        assert!(!tag.is_empty());
        assert_eq!(tag.as_bytes(), &[0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn short_replies_give_empty_uid() {
        let replies: [&[u8]; 4] = [&[], &[0x00, 0x01, 0x02], &[0x00, 0x01, 0x02, 0x03], &[0x00]];

        for reply in replies {
            let tag = TagId::from_anticollision(reply).unwrap();
            assert!(tag.is_empty());
            assert_eq!(tag.as_str(), "");
        }
    }

    #[test]
    fn longest_uid_fits() {
        let data = [0x0Fu8; MAX_PAYLOAD_LEN];
        let tag = TagId::from_anticollision(&data).unwrap();

        assert_eq!(tag.as_bytes().len(), MAX_PAYLOAD_LEN - 4);
        assert_eq!(tag.as_str().len(), 2 * (MAX_PAYLOAD_LEN - 4));
    }

    #[test]
    fn displays_as_hex() {
        let tag = TagId::from_bytes(&[0x04, 0xA2, 0x1F]).unwrap();
        assert_eq!(std::format!("{}", tag), "04A21F");
    }
}
