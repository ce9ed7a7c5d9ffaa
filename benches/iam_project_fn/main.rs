use iam_project_fn::{FunctionConfig, Resource};

fn main() {
    divan::main();
}

fn resources(n: usize) -> Vec<Resource> {
    (0..n)
        .map(|i| {
            let yaml = match i % 3 {
                0 => format!(
                    "apiVersion: iam.cnrm.cloud.google.com/v1beta1\nkind: IAMPolicyMember\nmetadata:\n  name: wi-{i}\nspec:\n  role: roles/iam.workloadIdentityUser\n  member: serviceAccount:ns{i}.svc.id.goog[default/sa{i}]\n"
                ),
                1 => format!(
                    "apiVersion: iam.cnrm.cloud.google.com/v1beta1\nkind: IAMPolicyMember\nmetadata:\n  name: sr-{i}\nspec:\n  role: roles/source.reader\n  member: sa{i}@orig.iam.gserviceaccount.com\n  resourceRef:\n    kind: Project\n    external: projects/orig\n"
                ),
                _ => format!("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm-{i}\ndata:\n  foo: bar\n"),
            };
            iam_project_fn::yaml::from_str(&yaml).unwrap()
        })
        .collect()
}

#[divan::bench(args = [10, 1000, 10000])]
fn process(bencher: divan::Bencher, n: usize) {
    let config = FunctionConfig::from_data([("projectID", "proj-123")]);
    let input = resources(n);
    bencher
        .with_inputs(|| input.clone())
        .bench_local_values(|mut resources| {
            iam_project_fn::process(&mut resources, &config).unwrap();
            resources
        });
}
