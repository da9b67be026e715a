//! The schema provider capability.
//!
//! Every registered record type is described by a [`SchemaProvider`]: its
//! field table, the discriminator string ("source") that marks its nodes in
//! the store, the schema directives it needs, and the types it depends on.

use crate::{Directive, FieldDescriptor, FieldType, Record, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Reserved identity key of every node.
pub const UID: &str = "uid";

/// Shared handle to a registered type.
pub type Provider = Arc<dyn SchemaProvider>;

/// Contract every registered record type satisfies.
pub trait SchemaProvider: fmt::Debug + Send + Sync {
    /// Identity of the type within a registry.
    fn name(&self) -> &str;

    /// Discriminator string written as type marker, if the type has one.
    fn source(&self) -> Option<&str>;

    fn fields(&self) -> &[FieldDescriptor];

    /// Resolve a store key to `(field name, field type)`.
    fn field(&self, store_key: &str) -> Option<(&str, FieldType)> {
        self.fields()
            .iter()
            .find(|field| field.store_key == store_key)
            .map(|field| (field.name.as_str(), field.field_type))
    }

    /// Resolve a field name to its store key.
    fn store_key(&self, field: &str) -> Option<&str> {
        self.fields()
            .iter()
            .find(|descriptor| descriptor.name == field)
            .map(|descriptor| descriptor.store_key.as_str())
    }

    /// Schema directives this type needs, in declaration order.
    fn alter(&self) -> Vec<Directive> {
        self.fields()
            .iter()
            .filter_map(|field| field.alter.clone())
            .collect()
    }

    /// Types this one refers to and needs in the store's schema.
    fn depends_on(&self) -> Vec<Provider> {
        Vec::new()
    }

    /// A record of this type with every attribute at its default.
    fn instantiate(&self) -> Box<dyn Record>;
}

/// Resolve a store key against a provider, honoring the reserved `uid` key.
pub fn resolve_field<'a>(
    provider: &'a dyn SchemaProvider,
    store_key: &str,
) -> Option<(&'a str, FieldType)> {
    if store_key == UID {
        return Some((UID, FieldType::String));
    }
    provider.field(store_key)
}

/// Static description of a [`Model`] type.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    pub name: String,
    pub source: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    /// Type-level directives, emitted after the field directives
    pub directives: Vec<Directive>,
    depends_on: Vec<fn() -> Provider>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            fields: Vec::new(),
            directives: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Declare a dependency. Resolved lazily so types may refer to each other.
    pub fn depends_on<M: Model>(mut self) -> Self {
        self.depends_on.push(provider::<M>);
        self
    }
}

/// A statically declared record type.
///
/// Implementing `Model` makes the type a [`Record`] and gives it a
/// [`Provider`] through [`provider`].
pub trait Model: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn schema() -> TypeSchema;

    /// Attribute values in declaration order, `uid` included.
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Set one attribute; hand the value back if it does not fit.
    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value>;
}

struct ModelType<M> {
    schema: TypeSchema,
    _model: PhantomData<fn() -> M>,
}

impl<M> fmt::Debug for ModelType<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.schema.name)
            .field("source", &self.schema.source)
            .finish()
    }
}

impl<M: Model> SchemaProvider for ModelType<M> {
    fn name(&self) -> &str {
        &self.schema.name
    }

    fn source(&self) -> Option<&str> {
        self.schema.source.as_deref()
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.schema.fields
    }

    fn alter(&self) -> Vec<Directive> {
        self.schema
            .fields
            .iter()
            .filter_map(|field| field.alter.clone())
            .chain(self.schema.directives.iter().cloned())
            .collect()
    }

    fn depends_on(&self) -> Vec<Provider> {
        self.schema.depends_on.iter().map(|resolve| resolve()).collect()
    }

    fn instantiate(&self) -> Box<dyn Record> {
        Box::new(M::default())
    }
}

/// The provider describing model type `M`.
pub fn provider<M: Model>() -> Provider {
    Arc::new(ModelType::<M> {
        schema: M::schema(),
        _model: PhantomData,
    })
}
