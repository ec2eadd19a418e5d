//! Single-line design transfer strings: `clinic:v1:<size>x<size>:<base64 json>`.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use dental_planner_persistence::Workspace;
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "clinic";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded payload.
pub(crate) const TRANSFER_HEADER: &str = "clinic:v1";
/// Delimiter separating the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the workspace into a string suitable for clipboard transfer.
pub(crate) fn encode(workspace: &Workspace) -> Result<String, TransferError> {
    let json = serde_json::to_vec(workspace).map_err(TransferError::Serialize)?;
    let size = workspace.grid.size();
    Ok(format!(
        "{TRANSFER_HEADER}:{size}x{size}:{}",
        STANDARD_NO_PAD.encode(json)
    ))
}

/// Decodes a workspace from its transfer string.
pub(crate) fn decode(value: &str) -> Result<Workspace, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }

    let size = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TransferError::InvalidEncoding)?;
    let workspace: Workspace =
        serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;

    if workspace.grid.size() != size {
        return Err(TransferError::DimensionMismatch {
            declared: size,
            actual: workspace.grid.size(),
        });
    }
    Ok(workspace)
}

/// Errors that can occur while decoding design transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("transfer string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("transfer string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("transfer string is missing the version")]
    MissingVersion,
    /// The grid dimensions were missing.
    #[error("transfer string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("transfer string is missing the payload")]
    MissingPayload,
    /// The prefix segment named another format.
    #[error("transfer prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment named an unsupported revision.
    #[error("transfer version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions were malformed, zero or not square.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The declared dimensions disagree with the decoded grid.
    #[error("declared grid size {declared} does not match payload size {actual}")]
    DimensionMismatch {
        /// Size named in the header.
        declared: u32,
        /// Size of the decoded grid.
        actual: u32,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode transfer payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse transfer payload")]
    InvalidPayload(#[source] serde_json::Error),
    /// The workspace could not be serialised.
    #[error("could not serialise workspace")]
    Serialize(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<u32, TransferError> {
    let invalid = || TransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || columns != rows {
        return Err(invalid());
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_planner_core::{CellCoord, Grid, RoomType};

    #[test]
    fn furnished_workspace_survives_transfer() {
        let mut workspace = Workspace::fresh();
        workspace
            .grid
            .tile_mut(CellCoord::new(6, 2))
            .expect("cell inside grid")
            .room_type = RoomType::Restroom;

        let encoded = encode(&workspace).expect("workspace encodes");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:15x15:")));
        assert_eq!(decode(&encoded).expect("transfer decodes"), workspace);
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert!(matches!(decode("   "), Err(TransferError::EmptyPayload)));
        assert!(matches!(decode("clinic"), Err(TransferError::MissingVersion)));
        assert!(matches!(
            decode("floorplan:v1:15x15:e30"),
            Err(TransferError::InvalidPrefix(prefix)) if prefix == "floorplan"
        ));
        assert!(matches!(
            decode("clinic:v2:15x15:e30"),
            Err(TransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            decode("clinic:v1:15x12:e30"),
            Err(TransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            decode("clinic:v1:15x15:***"),
            Err(TransferError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn declared_size_must_match_payload() {
        let workspace = Workspace {
            grid: Grid::new(4),
            ..Workspace::fresh()
        };
        let encoded = encode(&workspace).expect("workspace encodes");
        let forged = encoded.replacen(":4x4:", ":15x15:", 1);

        assert!(matches!(
            decode(&forged),
            Err(TransferError::DimensionMismatch {
                declared: 15,
                actual: 4
            })
        ));
    }
}
