use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::{error::Error, fieldspec::FieldPath};

pub type Object = Mapping;

/// A single manifest from a `ResourceList`.
///
/// Resources are kept as an untyped YAML tree so that anything this function does not touch
/// (key order, tags, non-finite floats) is written back out exactly as it came in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Resource {
    root: Object,
}

impl From<Object> for Resource {
    fn from(root: Object) -> Self {
        Resource { root }
    }
}

impl Resource {
    pub fn root(&self) -> &Object {
        &self.root
    }

    pub fn kind(&self) -> Option<&str> {
        self.root.get("kind").and_then(Value::as_str)
    }

    pub fn metadata(&self) -> Option<MetadataView<'_>> {
        self.root
            .get("metadata")
            .and_then(Value::as_mapping)
            .map(MetadataView)
    }

    pub fn id(&self) -> ResId<'_> {
        let metadata = self.metadata();
        ResId {
            kind: self.kind().unwrap_or_default(),
            name: metadata.as_ref().and_then(|m| m.name()).unwrap_or_default(),
            namespace: metadata.as_ref().and_then(|m| m.namespace()),
        }
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.get(&self.root)
    }

    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn set_str(&mut self, path: &FieldPath, value: impl Into<String>) -> Result<(), Error> {
        path.set(&mut self.root, Value::String(value.into()))
    }
}

#[derive(Debug)]
pub struct MetadataView<'a>(&'a Object);

impl<'a> MetadataView<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.0.get("namespace").and_then(Value::as_str)
    }
}

/// Borrowed identity of a resource, used to name it in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResId<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub namespace: Option<&'a str>,
}

impl fmt::Display for ResId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = self.namespace {
            write!(f, "{}/{}.{namespace}", self.kind, self.name)
        } else {
            write!(f, "{}/{}", self.kind, self.name)
        }
    }
}
