use std::sync::LazyLock;

use anyhow::Context as _;
use serde_yaml::Value;

use crate::{
    error::Error,
    fieldspec::FieldPath,
    manifest::{Str, Symbol, kind},
    resource::Resource,
    role::Role,
};

use super::Transformer;

static MEMBER: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::new(["spec", "member"]));
static RESOURCE_REF_EXTERNAL: LazyLock<FieldPath> =
    LazyLock::new(|| FieldPath::new(["spec", "resourceRef", "external"]));

/// Points the members of `IAMPolicyMember` bindings at another project.
pub struct ProjectIdTransformer {
    project_id: Str,
}

impl ProjectIdTransformer {
    pub fn new(project_id: impl Into<Str>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    /// Rewrites a single resource in place. Returns whether anything was changed.
    pub fn process(&self, resource: &mut Resource) -> Result<bool, Error> {
        if resource.kind() != Some(kind::IamPolicyMember::VALUE) {
            return Ok(false);
        }

        let Some(spec) = resource.root().get("spec").and_then(Value::as_mapping) else {
            return Ok(false);
        };

        if spec.is_empty() {
            return Ok(false);
        }

        let Some(role) = spec.get("role").and_then(Value::as_str).and_then(Role::parse) else {
            return Ok(false);
        };

        let member = spec.get("member").and_then(Value::as_str).unwrap_or_default();
        let new_member = role.rewrite_member(member, &self.project_id)?;

        tracing::debug!(
            resource = %resource.id(),
            %role,
            member,
            new_member = %new_member,
            "rewriting member"
        );

        resource.set_str(&MEMBER, new_member)?;
        if let Some(external) = role.resource_ref_external(&self.project_id) {
            resource.set_str(&RESOURCE_REF_EXTERNAL, external)?;
        }

        Ok(true)
    }
}

impl Transformer for ProjectIdTransformer {
    #[tracing::instrument(skip_all, name = "project_id_transform", fields(project_id = %self.project_id))]
    fn transform(&mut self, resources: &mut [Resource]) -> anyhow::Result<()> {
        let mut rewritten = 0usize;
        for resource in resources.iter_mut() {
            let id = resource.id().to_string();
            if self
                .process(resource)
                .with_context(|| format!("rewriting resource `{id}`"))?
            {
                rewritten += 1;
            }
        }

        tracing::info!(total = resources.len(), rewritten, "rewrote IAM policy members");
        Ok(())
    }
}
