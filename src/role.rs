use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

// Capture 2 is the workload identity pool suffix, e.g. `id.goog[default/sa1]`.
static WORKLOAD_IDENTITY_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"serviceAccount:(.+)\.svc\.(.*)").unwrap());

// Capture 1 is the service account local name, capture 2 the project it lives in.
static SERVICE_ACCOUNT_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)@(.*)\.iam\.gserviceaccount\.com").unwrap());

/// The IAM roles whose bindings are retargeted at a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    WorkloadIdentityUser,
    SourceReader,
}

impl Role {
    /// Returns `None` for any role that is left alone.
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "roles/iam.workloadIdentityUser" => Some(Role::WorkloadIdentityUser),
            "roles/source.reader" => Some(Role::SourceReader),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::WorkloadIdentityUser => "roles/iam.workloadIdentityUser",
            Role::SourceReader => "roles/source.reader",
        }
    }

    fn member_regex(&self) -> &'static Regex {
        match self {
            Role::WorkloadIdentityUser => &*WORKLOAD_IDENTITY_MEMBER,
            Role::SourceReader => &*SERVICE_ACCOUNT_MEMBER,
        }
    }

    pub fn member_pattern(&self) -> &'static str {
        self.member_regex().as_str()
    }

    /// Rewrites `member` so that it refers to `project_id`.
    pub fn rewrite_member(&self, member: &str, project_id: &str) -> Result<String, Error> {
        let captures = self
            .member_regex()
            .captures(member)
            .ok_or_else(|| Error::MemberMismatch {
                role: *self,
                member: member.into(),
            })?;

        // Both patterns have two mandatory groups so indexing cannot fail once matched.
        Ok(match self {
            Role::WorkloadIdentityUser => {
                format!("serviceAccount:{project_id}.svc.{}", &captures[2])
            }
            Role::SourceReader => {
                format!("{}@{project_id}.iam.gserviceaccount.com", &captures[1])
            }
        })
    }

    /// `spec.resourceRef.external` for roles that pin the bound resource to the project.
    pub fn resource_ref_external(&self, project_id: &str) -> Option<String> {
        match self {
            Role::WorkloadIdentityUser => None,
            Role::SourceReader => Some(format!("projects/{project_id}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
