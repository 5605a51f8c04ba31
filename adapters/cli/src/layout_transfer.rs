#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rampart_core::WeaponRecord;
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "rampart";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "rampart:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Placed weapons captured for transfer between sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct WeaponLayout {
    /// Weapons composing the layout, in placement order.
    pub(crate) records: Vec<WeaponRecord>,
}

impl WeaponLayout {
    /// Encodes the layout into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&self.records).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{LAYOUT_HEADER}{FIELD_DELIMITER}{encoded}"))
    }

    /// Decodes a layout from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let records = serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;
        Ok(Self { records })
    }
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded layout did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{CellCoord, SpecializationId, WeaponKind};

    #[test]
    fn populated_layout_survives_transfer() {
        let layout = WeaponLayout {
            records: vec![
                WeaponRecord {
                    kind: WeaponKind::Tesla,
                    cell: CellCoord::new(5, 7),
                    level: 3,
                    specialization: Some(SpecializationId::Overload),
                },
                WeaponRecord {
                    kind: WeaponKind::TarTrap,
                    cell: CellCoord::new(12, 4),
                    level: 1,
                    specialization: None,
                },
            ],
        };

        let encoded = layout.encode().expect("layout encodes");
        assert!(encoded.starts_with(&format!("{LAYOUT_HEADER}:")));

        let decoded = WeaponLayout::decode(&encoded).expect("layout decodes");
        assert_eq!(layout, decoded);
    }

    #[test]
    fn rejects_foreign_prefix_and_version() {
        assert!(matches!(
            WeaponLayout::decode("fortress:v1:W10"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "fortress"
        ));
        assert!(matches!(
            WeaponLayout::decode("rampart:v2:W10"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            WeaponLayout::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            WeaponLayout::decode("rampart:v1"),
            Err(LayoutTransferError::MissingPayload)
        ));
    }

    #[test]
    fn rejects_corrupted_payload() {
        assert!(matches!(
            WeaponLayout::decode("rampart:v1:***"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));

        let not_records = STANDARD_NO_PAD.encode(br#"{"kind":"arrow"}"#);
        assert!(matches!(
            WeaponLayout::decode(&format!("rampart:v1:{not_records}")),
            Err(LayoutTransferError::InvalidPayload(_))
        ));
    }
}
