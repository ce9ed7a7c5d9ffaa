use std::path::Path;

use anyhow::Context;
use serde_yaml::Value;

datatest_stable::harness! {
    { test = test, root = "tests/iam_project_fn/testdata", pattern = r"input\.yaml$" },
}

fn test(path: &Path) -> datatest_stable::Result<()> {
    let dir = path.parent().unwrap();
    let input = std::fs::read(path).context("reading input")?;
    let mut out = Vec::new();
    let res = iam_project_fn::run(input.as_slice(), &mut out);
    let actual = String::from_utf8(out)?;

    let expected_err = dir.join("expected.err");
    match res {
        Ok(()) => {
            if expected_err.exists() {
                return Err(format!("expected an error for {}", path.display()).into());
            }
            snapshot(&dir.join("expected.yaml"), &actual)?;
        }
        Err(err) => {
            if !expected_err.exists() {
                eprintln!("Error running function on {}: {err:?}", path.display());
                return Err(format!("unexpected error for {}", path.display()).into());
            }

            let message = format!("{err:#}");
            let expected = std::fs::read_to_string(&expected_err).context("reading expected.err")?;
            let expected = expected.trim();
            if !message.contains(expected) {
                eprintln!(
                    "Error mismatch for {}:\n{}",
                    path.display(),
                    format_chunks(dissimilar::diff(expected, &message))
                );
                return Err(format!("error mismatch for {}", path.display()).into());
            }

            // The failure is reported in results and the items are handed back untouched.
            let output: iam_project_fn::ResourceList = iam_project_fn::yaml::from_str(&actual)?;
            let input: iam_project_fn::ResourceList = iam_project_fn::yaml::from_slice(&input)?;
            if output.items != input.items {
                return Err(format!("items were modified for {}", path.display()).into());
            }
            if !output.results.iter().any(|r| r.message() == Some(message.as_str())) {
                return Err(format!("error not reported in results for {}", path.display()).into());
            }
        }
    }

    Ok(())
}

// Snapshots are compared as parsed YAML, so the emitter's quoting choices do not matter. Key order
// does: `serde_yaml::Value` equality ignores it, so the key paths are compared in document order
// as well.
fn snapshot(path: &Path, actual: &str) -> datatest_stable::Result<()> {
    if !path.exists() || std::env::var("UPDATE_SNAPSHOTS").is_ok() {
        std::fs::write(path, actual).context("writing snapshot")?;
        return Ok(());
    }

    let expected = std::fs::read_to_string(path).context("reading snapshot")?;
    let expected_value = serde_yaml::from_str::<Value>(&expected)?;
    let actual_value = serde_yaml::from_str::<Value>(actual)?;
    if expected_value == actual_value && key_paths(&expected_value) == key_paths(&actual_value) {
        return Ok(());
    }

    let chunks = dissimilar::diff(&expected, actual);
    eprintln!(
        "Snapshot mismatch for {}:\n{}",
        path.display(),
        format_chunks(chunks)
    );

    Err(format!("Snapshot mismatch for {}", path.display()).into())
}

fn key_paths(value: &Value) -> Vec<String> {
    fn walk(value: &Value, prefix: &str, out: &mut Vec<String>) {
        match value {
            Value::Mapping(map) => {
                for (key, value) in map {
                    let key = match key {
                        Value::String(s) => s.clone(),
                        key => format!("{key:?}"),
                    };
                    let path = format!("{prefix}/{key}");
                    out.push(path.clone());
                    walk(value, &path, out);
                }
            }
            Value::Sequence(seq) => {
                for (i, value) in seq.iter().enumerate() {
                    walk(value, &format!("{prefix}/{i}"), out);
                }
            }
            Value::Tagged(tagged) => walk(&tagged.value, prefix, out),
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(value, "", &mut out);
    out
}

fn format_chunks(chunks: Vec<dissimilar::Chunk<'_>>) -> String {
    let mut buf = String::new();
    for chunk in chunks {
        let formatted = match chunk {
            dissimilar::Chunk::Equal(text) => text.into(),
            dissimilar::Chunk::Delete(text) => format!("\x1b[4m\x1b[31m{}\x1b[0m", text),
            dissimilar::Chunk::Insert(text) => format!("\x1b[4m\x1b[32m{}\x1b[0m", text),
        };
        buf.push_str(&formatted);
    }
    buf
}
