//! Validation context
//!
//! A context lives for a single validation call tree. The dispatcher derives
//! a field context from the caller's one for every field it visits, filling
//! in the instance, label and nullability the field was declared with.

use crate::config::AgeSettings;
use crate::messages;
use crate::schema::Model;

/// Ephemeral state handed to every validator
#[derive(Debug, Clone, Default)]
pub struct ValidationContext<'a> {
    /// The model instance whose field is being validated
    pub instance: Option<&'a dyn Model>,
    /// Display name of the entity that owns the field
    pub owner: Option<String>,
    /// Field label override
    pub label: Option<String>,
    /// Detail appended to format failures
    pub extra_message: Option<String>,
    /// Nullability override
    pub nullable: Option<bool>,
    /// Reference date and adult threshold
    pub age: AgeSettings,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_extra_message(mut self, extra_message: impl Into<String>) -> Self {
        self.extra_message = Some(extra_message.into());
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn with_age(mut self, age: AgeSettings) -> Self {
        self.age = age;
        self
    }

    pub fn with_instance(mut self, instance: &'a dyn Model) -> Self {
        self.instance = Some(instance);
        self
    }

    /// The owner, if one is set and non-empty
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref().filter(|owner| !owner.is_empty())
    }

    /// The label override, or `default`
    pub fn label_or<'s>(&'s self, default: &'s str) -> &'s str {
        self.label.as_deref().unwrap_or(default)
    }

    pub fn extra_message(&self) -> Option<&str> {
        self.extra_message.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// Owner prefix for messages, `"{owner}的"` or empty
    pub fn whose(&self) -> String {
        messages::whose(self.owner())
    }

    /// The instance as a concrete model type
    pub fn instance_as<T: Model>(&self) -> Option<&'a T> {
        self.instance?.as_any().downcast_ref::<T>()
    }
}
