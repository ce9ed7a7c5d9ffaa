use core::fmt;

use crate::{fieldspec::FieldPath, manifest::Str, role::Role};

/// The ways rewriting a batch of resources can fail.
///
/// Every variant is fatal for the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `projectID` is absent (or empty) in the function config.
    MissingProjectId,
    /// `projectID` is present but is not a scalar.
    InvalidProjectId,
    /// A recognized role carries a member that does not have the expected shape.
    MemberMismatch { role: Role, member: Str },
    /// A field could not be written because the path leading to it is not there.
    SetField { path: FieldPath, reason: Str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingProjectId => write!(
                f,
                "missing required parameter `{}` in function config data",
                crate::config::PROJECT_ID_KEY
            ),
            Error::InvalidProjectId => write!(
                f,
                "parameter `{}` in function config data must be a scalar",
                crate::config::PROJECT_ID_KEY
            ),
            Error::MemberMismatch { role, member } => write!(
                f,
                "member `{member}` does not match the expected form for role `{role}` (`{}`)",
                role.member_pattern()
            ),
            Error::SetField { path, reason } => {
                write!(f, "cannot set field `{path}`: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}
