//! Declarative model schemas.
//!
//! A [`ModelSchema`] is what a referrable model declares about itself: its
//! fields in declaration order, which of them form the key, its details view
//! and the model it extends. The registry turns it into a
//! [`KeyDescriptor`](crate::descriptor::KeyDescriptor) once per model.
//!
//! ```text
//! ModelSchema::new("Page")
//!     .details_view("get_page")
//!     .key_field("book_id", FieldType::of::<i64>(), PrimaryKey::new())
//!     .key_field("page_number", FieldType::of::<i64>(), PrimaryKey::new())
//! ```

use crate::descriptor::KeyDescriptor;
use crate::error::ConfigError;
use crate::href::Href;
use crate::referrable::Referrable;
use std::any::{TypeId, type_name};

/// Field name used as the key when no field is annotated.
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Looks up (building on first use) the descriptor of a model.
pub type DescriptorFn = fn() -> Result<&'static KeyDescriptor, ConfigError>;

/// Runtime identity of a plain field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_id: TypeId,
    pub name: &'static str,
}

impl TypeInfo {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// The referrable model a hyperlink field points at.
#[derive(Debug, Clone, Copy)]
pub struct HrefTarget {
    /// `TypeId` of the model itself.
    pub model: TypeId,
    /// `TypeId` of `Href<Model>`.
    pub href: TypeId,
    /// Declared model name, as given to [`ModelSchema::new`].
    pub name: fn() -> &'static str,
    pub type_name: &'static str,
    pub descriptor: DescriptorFn,
}

/// The declared type of a model field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    Value(TypeInfo),
    Href(HrefTarget),
}

impl FieldType {
    /// A field of plain type `T`.
    pub fn of<T: 'static>() -> Self {
        Self::Value(TypeInfo::of::<T>())
    }

    /// A hyperlink field, `Href<T>`.
    pub fn href<T: Referrable>() -> Self {
        Self::Href(HrefTarget {
            model: TypeId::of::<T>(),
            href: TypeId::of::<Href<T>>(),
            name: model_name::<T>,
            type_name: type_name::<Href<T>>(),
            descriptor: T::descriptor,
        })
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            Self::Value(info) => info.type_id,
            Self::Href(target) => target.href,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Value(info) => info.name,
            Self::Href(target) => target.type_name,
        }
    }
}

fn model_name<T: Referrable>() -> &'static str {
    T::schema().name
}

/// Key membership annotation on a field.
#[derive(Debug, Clone, Default)]
pub struct PrimaryKey {
    pub(crate) name: Option<String>,
    pub(crate) key_type: Option<FieldType>,
}

impl PrimaryKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route parameter name to use instead of the field name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Explicit key type, required when the key field is a hyperlink to the
    /// model being declared.
    pub fn key_type(mut self, key_type: FieldType) -> Self {
        self.key_type = Some(key_type);
        self
    }
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) ty: FieldType,
    pub(crate) keys: Vec<PrimaryKey>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            keys: Vec::new(),
        }
    }

    /// Mark the field as part of the key.
    pub fn primary_key(mut self, key: PrimaryKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_key(&self) -> bool {
        !self.keys.is_empty()
    }
}

/// The base model of a derived model.
#[derive(Debug, Clone, Copy)]
pub struct ParentRef {
    pub type_id: TypeId,
    pub name: fn() -> &'static str,
    pub descriptor: DescriptorFn,
}

/// Everything a model declares about itself.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    pub(crate) name: &'static str,
    pub(crate) details_view: Option<String>,
    pub(crate) parent: Option<ParentRef>,
    pub(crate) fields: Vec<FieldSpec>,
}

impl ModelSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            details_view: None,
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Name of the view rendering one instance of the model.
    pub fn details_view(mut self, view: impl Into<String>) -> Self {
        self.details_view = Some(view.into());
        self
    }

    /// Inherit key fields and details view from `P`.
    pub fn extends<P: Referrable>(mut self) -> Self {
        self.parent = Some(ParentRef {
            type_id: TypeId::of::<P>(),
            name: model_name::<P>,
            descriptor: P::descriptor,
        });
        self
    }

    pub fn field(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.with_field(FieldSpec::new(name, ty))
    }

    pub fn key_field(self, name: impl Into<String>, ty: FieldType, key: PrimaryKey) -> Self {
        self.with_field(FieldSpec::new(name, ty).primary_key(key))
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}
