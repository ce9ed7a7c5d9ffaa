//! A KRM function that retargets `IAMPolicyMember` resources at a GCP project.
//!
//! Two bindings are rewritten, everything else passes through untouched:
//!
//! - `roles/iam.workloadIdentityUser`: `serviceAccount:<pool>.svc.<suffix>` becomes
//!   `serviceAccount:<projectID>.svc.<suffix>`.
//! - `roles/source.reader`: `<name>@<project>.iam.gserviceaccount.com` becomes
//!   `<name>@<projectID>.iam.gserviceaccount.com`, and `spec.resourceRef.external` is set to
//!   `projects/<projectID>`.

use std::io::{Read, Write};

use anyhow::Context as _;

pub mod config;
pub mod error;
pub mod fieldspec;
pub mod manifest;
pub mod reslist;
pub mod resource;
pub mod role;
pub mod transform;
pub mod yaml;

pub use self::config::FunctionConfig;
pub use self::error::Error;
pub use self::reslist::ResourceList;
pub use self::resource::Resource;
pub use self::role::Role;

use self::transform::{ProjectIdTransformer, Transformer as _};

/// Rewrites `resources` for the `projectID` in `config`.
///
/// Either every resource is processed or, on error, `resources` is left exactly as it was.
pub fn process(resources: &mut Vec<Resource>, config: &FunctionConfig) -> anyhow::Result<()> {
    let project_id = config.project_id()?;

    let mut output = resources.clone();
    ProjectIdTransformer::new(project_id).transform(&mut output)?;
    *resources = output;
    Ok(())
}

impl ResourceList {
    /// Runs the function over this list's items using its `functionConfig`.
    pub fn process(&mut self) -> anyhow::Result<()> {
        let config = self.function_config.clone().unwrap_or_default();
        process(&mut self.items, &config)
    }
}

/// Reads a `ResourceList`, processes it and writes it back out.
///
/// Failures are also recorded in the output list's `results` so the orchestrator can surface
/// them; the items are written back unmodified in that case.
#[tracing::instrument(skip_all)]
pub fn run(input: impl Read, mut output: impl Write) -> anyhow::Result<()> {
    let mut list: ResourceList = yaml::from_reader(input).context("parsing input ResourceList")?;
    tracing::debug!(items = list.items.len(), "read ResourceList");

    let res = list.process();
    if let Err(err) = &res {
        list.push_error(err);
    }

    yaml::to_writer(&mut output, &list).context("writing output ResourceList")?;
    output.flush()?;
    res
}
