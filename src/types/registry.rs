//! Type Tag Registry
//!
//! Append-only mapping between type names, one-byte tags and operators.
//! A registry is built once and is read-only afterwards, so lookups need
//! no locking and a single instance can be shared across threads.

use std::sync::OnceLock;

use crate::error::{RecordError, Result};
use crate::record::TypeTag;

use super::{Int64Operator, Operator, StringOperator, ValueOperator};

/// Registered value types
#[derive(Debug)]
pub struct TypeRegistry {
    /// Operator slot per tag byte
    operators: Vec<Option<Operator>>,
    /// (name, tag) in registration order
    names: Vec<(String, TypeTag)>,
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    /// Start an empty registry
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            registry: TypeRegistry {
                operators: vec![None; u8::MAX as usize + 1],
                names: Vec::new(),
            },
        }
    }

    /// Registry holding the built-in STRING and INT64 types
    pub fn builtin() -> Self {
        TypeRegistryBuilder::with_builtins().build()
    }

    /// Process-wide registry of the built-in types
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(TypeRegistry::builtin)
    }

    /// Operator registered for `tag`
    pub fn operator(&self, tag: TypeTag) -> Option<&Operator> {
        self.operators[tag.0 as usize].as_ref()
    }

    /// Tag registered under `name`
    pub fn type_name_to_tag(&self, name: &str) -> Option<TypeTag> {
        self.names
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, tag)| *tag)
    }

    /// Name registered for `tag` (linear scan)
    pub fn tag_to_type_name(&self, tag: TypeTag) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, registered)| *registered == tag)
            .map(|(name, _)| name.as_str())
    }

    /// True if `tag` has an operator
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.operator(tag).is_some()
    }

    /// Registered (name, tag) pairs in registration order
    pub fn types(&self) -> impl Iterator<Item = (&str, TypeTag)> {
        self.names.iter().map(|(name, tag)| (name.as_str(), *tag))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Builder for TypeRegistry
#[derive(Debug)]
pub struct TypeRegistryBuilder {
    registry: TypeRegistry,
}

impl TypeRegistryBuilder {
    /// Builder preloaded with STRING and INT64
    pub fn with_builtins() -> Self {
        let mut builder = TypeRegistry::builder();
        builder.insert("string", TypeTag::STRING, Operator::String(StringOperator));
        builder.insert("int64", TypeTag::INT64, Operator::Int64(Int64Operator));
        builder
    }

    /// Register an extension type
    ///
    /// Tags and names are append-only: reusing either is an error.
    pub fn register(
        mut self,
        tag: TypeTag,
        name: impl Into<String>,
        operator: impl ValueOperator + 'static,
    ) -> Result<Self> {
        let name = name.into();

        if let Some(existing) = self.registry.tag_to_type_name(tag) {
            return Err(RecordError::Registry(format!(
                "Type tag 0x{:02x} already registered as {}",
                tag.0, existing
            )));
        }

        if self.registry.type_name_to_tag(&name).is_some() {
            return Err(RecordError::Registry(format!(
                "Type name {} already registered",
                name
            )));
        }

        self.insert(name, tag, Operator::custom(operator));
        Ok(self)
    }

    fn insert(&mut self, name: impl Into<String>, tag: TypeTag, operator: Operator) {
        self.registry.operators[tag.0 as usize] = Some(operator);
        self.registry.names.push((name.into(), tag));
    }

    pub fn build(self) -> TypeRegistry {
        self.registry
    }
}

/// Tag for a type name in the global registry
pub fn type_name_to_tag(name: &str) -> Option<TypeTag> {
    TypeRegistry::global().type_name_to_tag(name)
}

/// Type name for a tag in the global registry
pub fn tag_to_type_name(tag: TypeTag) -> Option<&'static str> {
    TypeRegistry::global().tag_to_type_name(tag)
}
