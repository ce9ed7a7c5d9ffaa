use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, DeserializeOwned},
    ser::SerializeMap as _,
};
use serde_yaml::Value;

use crate::{
    config::FunctionConfig,
    manifest::{Str, Symbol, apiversion, kind},
    resource::{Object, Resource},
};

/// The KRM function wire format: the resources to transform plus the function's own config.
///
/// Known fields are read out of the document; everything else is kept in `rest` and written back
/// after them, so nothing the orchestrator sends is lost on the way through.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList {
    pub api_version: Str,
    pub kind: kind::ResourceList,
    pub items: Vec<Resource>,
    pub function_config: Option<FunctionConfig>,
    pub results: Vec<FnResult>,
    pub rest: Object,
}

impl ResourceList {
    pub fn new(
        resources: impl IntoIterator<Item = Resource>,
        function_config: Option<FunctionConfig>,
    ) -> Self {
        Self {
            api_version: apiversion::ConfigV1::VALUE.into(),
            kind: kind::ResourceList,
            items: resources.into_iter().collect(),
            function_config,
            results: Vec::new(),
            rest: Object::new(),
        }
    }

    pub fn push_error(&mut self, err: &anyhow::Error) {
        self.results
            .push(FnResult::new(format!("{err:#}"), Severity::Error));
    }
}

// Not `#[serde(flatten)]`: its buffering cannot represent YAML tags.
impl<'de> Deserialize<'de> for ResourceList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut root = Object::deserialize(deserializer)?;

        let api_version = take::<Str, D::Error>(&mut root, "apiVersion")?
            .unwrap_or_else(|| apiversion::ConfigV1::VALUE.into());
        let kind = take::<kind::ResourceList, D::Error>(&mut root, "kind")?
            .ok_or_else(|| de::Error::missing_field("kind"))?;
        let items = take_mappings::<D::Error>(&mut root, "items")?
            .into_iter()
            .map(Resource::from)
            .collect();
        let function_config = match root.shift_remove("functionConfig") {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(config)) => Some(FunctionConfig::from(config)),
            Some(_) => return Err(de::Error::custom("functionConfig: expected a mapping")),
        };
        let results = take_mappings::<D::Error>(&mut root, "results")?
            .into_iter()
            .map(FnResult)
            .collect();

        Ok(ResourceList {
            api_version,
            kind,
            items,
            function_config,
            results,
            rest: root,
        })
    }
}

impl Serialize for ResourceList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("apiVersion", &self.api_version)?;
        map.serialize_entry("kind", &self.kind)?;
        map.serialize_entry("items", &self.items)?;
        if let Some(function_config) = &self.function_config {
            map.serialize_entry("functionConfig", function_config)?;
        }
        if !self.results.is_empty() {
            map.serialize_entry("results", &self.results)?;
        }
        for (key, value) in &self.rest {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn take<T, E>(root: &mut Object, key: &str) -> Result<Option<T>, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    match root.shift_remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_yaml::from_value(value)
            .map(Some)
            .map_err(|err| E::custom(format!("{key}: {err}"))),
    }
}

fn take_mappings<E>(root: &mut Object, key: &str) -> Result<Vec<Object>, E>
where
    E: de::Error,
{
    let seq = match root.shift_remove(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(seq)) => seq,
        Some(_) => return Err(E::custom(format!("{key}: expected a sequence"))),
    };

    seq.into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            Value::Mapping(object) => Ok(object),
            _ => Err(E::custom(format!("{key}[{i}]: expected a mapping"))),
        })
        .collect()
}

/// An entry in `results`, reported back to the orchestrator.
///
/// Entries from upstream functions may carry `resourceRef`, `field`, `file` or `tags`; they are
/// kept as given.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FnResult(Object);

impl FnResult {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        let mut object = Object::new();
        object.insert("message".into(), Value::String(message.into()));
        object.insert("severity".into(), severity.as_str().into());
        FnResult(object)
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// Entries without a recognizable severity count as errors.
    pub fn severity(&self) -> Severity {
        self.0
            .get("severity")
            .and_then(Value::as_str)
            .and_then(Severity::parse)
            .unwrap_or_default()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}
