use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::value::{is_truthy, non_empty_str};

/// Fields whose truthiness marks a record as a real session.
const IDENTITY_FIELDS: [&str; 3] = ["token", "id", "email"];

/// Raw values some writers leave behind instead of removing the key.
const ABSENT_MARKERS: [&str; 2] = ["null", "undefined"];

/// The persisted authentication record.
///
/// Only `token`, `role` and `user.role` are interpreted. Every other field is
/// carried through untouched, so a record serializes back to exactly what was
/// stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct SessionRecord(Map<String, Value>);

/// Why a persisted value could not be used as a session.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("stored session is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored session is not a JSON object")]
    NotAnObject,
    #[error("stored session has none of token, id or email")]
    MissingIdentity,
}

impl SessionRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        SessionRecord(fields)
    }

    /// Parse the raw stored text.
    ///
    /// `Ok(None)` means nothing is stored: a blank value or one of the
    /// `"null"` / `"undefined"` markers.
    pub fn parse(raw: &str) -> Result<Option<Self>, RecordError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || ABSENT_MARKERS.contains(&trimmed) {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(trimmed)?;
        if value.is_null() {
            return Ok(None);
        }
        Self::try_from(value).map(Some)
    }

    /// Build the record to persist from a successful login response.
    ///
    /// Servers either answer with the user object itself (token included) or
    /// nest it under `user` next to a top-level `token`.
    pub fn from_login_response(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let record = match object.get("user").and_then(Value::as_object) {
            Some(user) => {
                let mut fields = user.clone();
                if let (false, Some(token)) = (fields.contains_key("token"), object.get("token")) {
                    fields.insert("token".to_string(), token.clone());
                }
                fields
            }
            None => object.clone(),
        };
        let record = SessionRecord(record);
        record.has_identity().then_some(record)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// True when at least one identity field is truthy.
    pub fn has_identity(&self) -> bool {
        IDENTITY_FIELDS
            .iter()
            .any(|key| self.0.get(*key).is_some_and(is_truthy))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The token field, if present and not `null`.
    pub fn token(&self) -> Option<&Value> {
        self.0.get("token").filter(|v| !v.is_null())
    }

    /// The token as a usable bearer credential.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token().and_then(non_empty_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl TryFrom<Value> for SessionRecord {
    type Error = RecordError;

    /// Accepts only objects carrying an identity field.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => {
                let record = SessionRecord(fields);
                if record.has_identity() {
                    Ok(record)
                } else {
                    Err(RecordError::MissingIdentity)
                }
            }
            _ => Err(RecordError::NotAnObject),
        }
    }
}

impl From<SessionRecord> for Value {
    fn from(record: SessionRecord) -> Self {
        Value::Object(record.0)
    }
}
