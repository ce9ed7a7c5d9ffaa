use std::{fs::File, io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Retarget IAMPolicyMember resources at the project in `functionConfig.data.projectID`.
///
/// Reads a ResourceList from stdin (or FILE) and writes the transformed ResourceList to stdout.
#[derive(Parser)]
#[command(name = "iam-project-fn", version, about)]
struct Args {
    /// Read the ResourceList from this file instead of stdin.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // stdout carries the ResourceList, logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let stdout = io::stdout().lock();
    match args.input {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("opening input file `{}`", path.display()))?;
            iam_project_fn::run(io::BufReader::new(file), stdout)
        }
        None => iam_project_fn::run(io::stdin().lock(), stdout),
    }
}
