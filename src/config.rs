use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::{error::Error, manifest::Str, resource::Object};

pub const PROJECT_ID_KEY: &str = "projectID";

/// The `functionConfig` of a `ResourceList`, shaped like a ConfigMap.
///
/// Only `data.projectID` is read; the object itself is written back out as it was given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FunctionConfig {
    root: Object,
}

impl From<Object> for FunctionConfig {
    fn from(root: Object) -> Self {
        FunctionConfig { root }
    }
}

impl FunctionConfig {
    pub fn from_data<K, V>(data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let data = data
            .into_iter()
            .map(|(k, v)| (Value::String(k.into()), Value::String(v.into())))
            .collect::<Object>();

        let mut root = Object::new();
        root.insert("data".into(), Value::Mapping(data));
        FunctionConfig { root }
    }

    pub fn root(&self) -> &Object {
        &self.root
    }

    /// Reads `data.projectID`. Scalars of any type are accepted as their textual form, so
    /// `projectID: 12345` is the same as `projectID: "12345"`.
    pub fn project_id(&self) -> Result<Str, Error> {
        let value = self
            .root
            .get("data")
            .and_then(Value::as_mapping)
            .and_then(|data| data.get(PROJECT_ID_KEY));

        let project_id: Str = match value {
            None | Some(Value::Null) => return Err(Error::MissingProjectId),
            Some(Value::String(s)) => s.as_str().into(),
            Some(Value::Number(n)) => n.to_string().into(),
            Some(Value::Bool(b)) => b.to_string().into(),
            Some(_) => return Err(Error::InvalidProjectId),
        };

        if project_id.is_empty() {
            return Err(Error::MissingProjectId);
        }

        Ok(project_id)
    }
}
