#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use redoubt_system_scheduler::FortificationPlan;

const PLAN_DOMAIN: &str = "redoubt";
const PLAN_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded plan payload.
pub(crate) const PLAN_HEADER: &str = "redoubt:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a fortification plan into a single-line string for sharing.
#[must_use]
pub(crate) fn encode_plan(plan: &FortificationPlan) -> String {
    let json = serde_json::to_vec(plan).expect("fortification plan serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{PLAN_HEADER}:{encoded}")
}

/// Decodes a fortification plan from its string representation.
pub(crate) fn decode_plan(value: &str) -> Result<FortificationPlan, PlanTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(PlanTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(PlanTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(PlanTransferError::MissingPayload)?;

    if domain != PLAN_DOMAIN {
        return Err(PlanTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != PLAN_VERSION {
        return Err(PlanTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(PlanTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(PlanTransferError::InvalidPayload)
}

/// Errors that can occur while decoding plan transfer strings.
#[derive(Debug)]
pub(crate) enum PlanTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded plan.
    MissingPrefix,
    /// The encoded plan did not contain a version segment.
    MissingVersion,
    /// The encoded plan did not include the payload segment.
    MissingPayload,
    /// The encoded plan used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded plan used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for PlanTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "plan string was empty"),
            Self::MissingPrefix => write!(f, "plan string is missing the prefix"),
            Self::MissingVersion => write!(f, "plan string is missing the version"),
            Self::MissingPayload => write!(f, "plan string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "plan prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "plan version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode plan payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse plan payload: {error}")
            }
        }
    }
}

impl Error for PlanTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
