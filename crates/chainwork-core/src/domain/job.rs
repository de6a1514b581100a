//! Job mapping and its reserved keys.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identifier::TaskIdentifier;
use crate::error::JobError;

/// Key stamped with the issuing task type's identifier.
pub const TASK_KEY: &str = "task";

/// Key holding the remaining follow-up identifiers.
pub const CHAIN_KEY: &str = "_chain";

/// A unit of work: an ordered string-keyed mapping of JSON values.
///
/// Two keys are reserved:
/// - `task`: stamped by the engine via [`Job::stamped`]
/// - `_chain`: follow-up identifiers, consumed one per hop by [`Job::successor`]
///
/// Everything else is payload owned by the task implementation and passes
/// through a chain hop untouched.
///
/// Design: `Job` is never mutated by the engine. Stamping and chain rewrite
/// both build a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Job(Map<String, Value>);

impl Job {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a job from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, JobError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(JobError::NotAnObject),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style `_chain` insert.
    pub fn with_chain<I, S>(self, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chain: Vec<Value> = chain.into_iter().map(|s| Value::String(s.into())).collect();
        self.with(CHAIN_KEY, Value::Array(chain))
    }

    /// Append identifiers after whatever `_chain` already holds.
    pub fn append_chain<I, S>(self, more: I) -> Result<Self, JobError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let more: Vec<String> = more.into_iter().map(Into::into).collect();
        let mut chain: Vec<String> = self
            .chain()?
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();
        if more.is_empty() {
            return Ok(self);
        }
        chain.extend(more);
        Ok(self.with_chain(chain))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The stamped routing identifier, if any.
    pub fn task(&self) -> Option<&str> {
        self.0.get(TASK_KEY).and_then(Value::as_str)
    }

    /// Remaining chain. Absent or `null` reads as empty.
    pub fn chain(&self) -> Result<Vec<TaskIdentifier>, JobError> {
        let items = match self.0.get(CHAIN_KEY) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(JobError::MalformedChain {
                    reason: format!("expected an array, got {other}"),
                });
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(TaskIdentifier::new(s.as_str())),
                other => Err(JobError::MalformedChain {
                    reason: format!("element {i} is not a string: {other}"),
                }),
            })
            .collect()
    }

    /// Copy of this job with `task` set to `identifier`.
    ///
    /// Other keys keep their values and order.
    pub fn stamped(&self, identifier: &TaskIdentifier) -> Job {
        let mut map = self.0.clone();
        map.insert(TASK_KEY.to_string(), Value::String(identifier.as_str().to_string()));
        Job(map)
    }

    /// Next hop of the chain: `(head, successor)`, or `None` if the chain is empty.
    ///
    /// The successor copies every key except `_chain`; the remaining chain is
    /// set only when non-empty, so the last hop carries no `_chain` at all.
    pub fn successor(&self) -> Result<Option<(TaskIdentifier, Job)>, JobError> {
        let chain = self.chain()?;
        let Some((head, rest)) = chain.split_first() else {
            return Ok(None);
        };

        let mut next: Map<String, Value> = self
            .0
            .iter()
            .filter(|(key, _)| key.as_str() != CHAIN_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if !rest.is_empty() {
            let rest = rest
                .iter()
                .map(|id| Value::String(id.as_str().to_string()))
                .collect();
            next.insert(CHAIN_KEY.to_string(), Value::Array(rest));
        }

        Ok(Some((head.clone(), Job(next))))
    }

    /// Decode the job into a typed payload. Unknown keys (including the
    /// reserved ones) are ignored unless `T` denies them.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, JobError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| JobError::Payload(e.to_string()))
    }
}

impl From<Map<String, Value>> for Job {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Job {
    type Error = JobError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
