#![allow(clippy::missing_errors_doc)]

//! Single-line encoding of a recorded session for sharing and replay.
//!
//! A session string carries everything needed to reproduce a run exactly:
//! the grid dimensions, the variant configuration, the seed, and the input
//! script. The format is `arcade:v1:<columns>x<rows>:<base64 payload>`.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SESSION_DOMAIN: &str = "arcade";
const SESSION_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded session payload.
pub(crate) const SESSION_HEADER: &str = "arcade:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of one recorded session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionSnapshot {
    /// Number of grid columns used by the run.
    pub columns: u32,
    /// Number of grid rows used by the run.
    pub rows: u32,
    /// Variant configuration of the run.
    pub game: SessionGame,
    /// Seed that drove all random placement.
    pub seed: u64,
    /// Input script consumed by the run.
    pub script: String,
}

/// Variant-specific parameters captured within a session snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum SessionGame {
    /// Merge-puzzle run parameters.
    Merge {
        /// Tile value that wins the round.
        target: u32,
    },
    /// Snake run parameters.
    Snake {
        /// Number of snakes placed onto the field.
        players: u32,
        /// Initial body length of each snake.
        length: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableSession {
    game: SessionGame,
    seed: u64,
    script: String,
}

impl SessionSnapshot {
    /// Encodes the session into a single-line string suitable for
    /// clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSession {
            game: self.game.clone(),
            seed: self.seed,
            script: self.script.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("session serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SESSION_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a session from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, SessionTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SessionTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(SessionTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(SessionTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(SessionTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(SessionTransferError::MissingPayload)?;

        if domain != SESSION_DOMAIN {
            return Err(SessionTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SESSION_VERSION {
            return Err(SessionTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: SerializableSession = serde_json::from_slice(&bytes)?;

        Ok(Self {
            columns,
            rows,
            game: decoded.game,
            seed: decoded.seed,
            script: decoded.script,
        })
    }
}

fn parse_dimensions(value: &str) -> Result<(u32, u32), SessionTransferError> {
    let mut parts = value.split('x');
    let columns = parts
        .next()
        .and_then(|part| part.parse::<u32>().ok())
        .ok_or_else(|| SessionTransferError::InvalidDimensions(value.to_owned()))?;
    let rows = parts
        .next()
        .and_then(|part| part.parse::<u32>().ok())
        .ok_or_else(|| SessionTransferError::InvalidDimensions(value.to_owned()))?;
    if parts.next().is_some() {
        return Err(SessionTransferError::InvalidDimensions(value.to_owned()));
    }
    Ok((columns, rows))
}

/// Errors that can occur while decoding session transfer strings.
#[derive(Debug, Error)]
pub(crate) enum SessionTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("session payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded session.
    #[error("session string is missing the prefix")]
    MissingPrefix,
    /// The encoded session did not contain a version segment.
    #[error("session string is missing the version")]
    MissingVersion,
    /// The encoded session did not include grid dimensions.
    #[error("session string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded session did not include the payload segment.
    #[error("session string is missing the payload")]
    MissingPayload,
    /// The encoded session used an unexpected prefix segment.
    #[error("session prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded session used an unsupported version identifier.
    #[error("session version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded session.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode session payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse session payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::{SessionGame, SessionSnapshot, SessionTransferError, SESSION_HEADER};

    fn sample_session() -> SessionSnapshot {
        SessionSnapshot {
            columns: 21,
            rows: 21,
            game: SessionGame::Snake {
                players: 2,
                length: 3,
            },
            seed: 0x5eed_cafe,
            script: "RR.U.L.".to_owned(),
        }
    }

    #[test]
    fn round_trips_through_encode_and_decode() {
        let session = sample_session();
        let encoded = session.encode();
        assert!(encoded.starts_with(SESSION_HEADER));
        let decoded = SessionSnapshot::decode(&encoded).expect("decode");
        assert_eq!(decoded, session);
    }

    #[test]
    fn merge_sessions_round_trip() {
        let session = SessionSnapshot {
            columns: 4,
            rows: 4,
            game: SessionGame::Merge { target: 2048 },
            seed: 17,
            script: "LLUR".to_owned(),
        };
        let decoded = SessionSnapshot::decode(&session.encode()).expect("decode");
        assert_eq!(decoded, session);
    }

    #[test]
    fn rejects_empty_payloads() {
        assert!(matches!(
            SessionSnapshot::decode("   "),
            Err(SessionTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn rejects_unknown_prefixes() {
        assert!(matches!(
            SessionSnapshot::decode("puzzle:v1:4x4:e30"),
            Err(SessionTransferError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn rejects_unsupported_versions() {
        assert!(matches!(
            SessionSnapshot::decode("arcade:v2:4x4:e30"),
            Err(SessionTransferError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn rejects_malformed_dimensions() {
        assert!(matches!(
            SessionSnapshot::decode("arcade:v1:4by4:e30"),
            Err(SessionTransferError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_corrupted_payloads() {
        let mut encoded = sample_session().encode();
        encoded.truncate(encoded.len() - 4);
        assert!(SessionSnapshot::decode(&encoded).is_err());
    }
}
