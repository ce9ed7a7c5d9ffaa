use core::fmt;
use std::ops::Deref;

use compact_str::format_compact;
use serde_yaml::Value;

use crate::{error::Error, manifest::Str, resource::Object};

/// A `/`-separated path of object fields, e.g. `spec/resourceRef/external`.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Box<[Str]>,
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#""{self}""#)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl Deref for FieldPath {
    type Target = [Str];

    fn deref(&self) -> &Self::Target {
        &self.segments
    }
}

impl FieldPath {
    pub fn new<const N: usize>(segments: [&str; N]) -> Self {
        const { assert!(N > 0, "path cannot be empty") };
        FieldPath {
            segments: segments.into_iter().map(Str::from).collect(),
        }
    }

    pub fn get<'a>(&self, root: &'a Object) -> Option<&'a Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut curr = root;
        for segment in parents {
            curr = curr.get(segment.as_str())?.as_mapping()?;
        }
        curr.get(last.as_str())
    }

    /// Sets the final field to `value`. Every field leading up to it must already be a mapping;
    /// nothing is created along the way.
    pub fn set(&self, root: &mut Object, value: Value) -> Result<(), Error> {
        let (last, parents) = self
            .segments
            .split_last()
            .expect("field paths are never empty");

        let mut curr = root;
        for (i, segment) in parents.iter().enumerate() {
            let at = || self.segments[..=i].join("/");
            curr = match curr.get_mut(segment.as_str()) {
                Some(Value::Mapping(obj)) => obj,
                Some(Value::Null) | None => {
                    return Err(Error::SetField {
                        path: self.clone(),
                        reason: format_compact!("missing field `{}`", at()),
                    });
                }
                Some(_) => {
                    return Err(Error::SetField {
                        path: self.clone(),
                        reason: format_compact!(
                            "expected an object value at `{}`",
                            at()
                        ),
                    });
                }
            };
        }

        curr.insert(Value::String(last.to_string()), value);
        Ok(())
    }
}
