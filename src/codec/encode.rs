//! Encode and omission hooks.
//!
//! Whether an empty field is dropped from the output is never implied by the
//! value type: callers pick an [`EmptyFields`] policy for every object they
//! write. With `EmptyFields::Omit` an explicit null and an absent key encode
//! the same way (both are omitted); with `EmptyFields::Keep` the null
//! survives as `null`.

use serde_json::{Map, Value};

/// Encode half of the codec hook triplet.
pub trait FieldEncoder {
    /// Native JSON representation of the value. Total: never fails.
    fn encode(&self) -> Value;

    /// Omission hint consulted under [`EmptyFields::Omit`].
    fn is_empty(&self) -> bool;
}

impl<T: FieldEncoder> FieldEncoder for Option<T> {
    fn encode(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldEncoder::encode)
    }

    fn is_empty(&self) -> bool {
        self.as_ref().map_or(true, FieldEncoder::is_empty)
    }
}

/// Policy for fields whose omission hook reports empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFields {
    /// Drop empty fields from the output object.
    Omit,
    /// Write every field, nulls included.
    Keep,
}

/// Builds a JSON object one field at a time under an explicit
/// [`EmptyFields`] policy.
#[derive(Debug, Clone)]
pub struct ObjectEncoder {
    policy: EmptyFields,
    fields: Map<String, Value>,
}

impl ObjectEncoder {
    pub fn new(policy: EmptyFields) -> Self {
        Self {
            policy,
            fields: Map::new(),
        }
    }

    pub fn policy(&self) -> EmptyFields {
        self.policy
    }

    /// Write `key`, unless the policy omits it.
    pub fn field<F: FieldEncoder + ?Sized>(&mut self, key: &str, value: &F) -> &mut Self {
        if self.policy == EmptyFields::Omit && value.is_empty() {
            return self;
        }
        self.fields.insert(key.to_string(), value.encode());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn finish(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn to_json_string(&self) -> String {
        // Value's Display is compact JSON
        Value::Object(self.fields.clone()).to_string()
    }
}
