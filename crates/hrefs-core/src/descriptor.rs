//! Key descriptors.
//!
//! A [`KeyDescriptor`] is the validated, immutable description of one model's
//! key: which fields form it, in declaration order, under which route
//! parameter names, and through which nested hyperlinks. It is built from a
//! [`ModelSchema`] exactly once per model by the
//! [registry](crate::registry) and shared read-only afterwards.
//!
//! ## Build rules
//!
//! 1. Fields annotated with [`PrimaryKey`] form the key, in declaration order.
//! 2. With no annotations, a field named [`DEFAULT_KEY_FIELD`] is the key.
//! 3. A base model's key is inherited; a derived model declaring its own key
//!    fields on top of it is rejected.
//! 4. A hyperlink key field pointing at the model being declared needs an
//!    explicit key type; its parameter is the renamed field itself.
//! 5. Other hyperlink key fields contribute their target's parameters,
//!    prefixed with the field's parameter name.
//! 6. The declared Rust key type must agree with the key fields.
//! 7. No two key fields may pack into the same route parameter.

use crate::error::ConfigError;
use crate::registry;
use crate::schema::{DEFAULT_KEY_FIELD, FieldSpec, FieldType, ModelSchema, PrimaryKey};
use serde::Serialize;
use std::any::TypeId;
use std::collections::BTreeSet;

/// Deepest supported chain of hyperlinks nested in keys.
pub const MAX_KEY_NESTING: usize = 2;

/// One field contributing to a model's key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyField {
    name: String,
    param_name: String,
    declared_type: &'static str,
    key_type: &'static str,
    #[serde(skip)]
    key_type_id: TypeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'static str>,
    self_referential: bool,
    is_explicit: bool,
    params: Vec<String>,
    #[serde(skip)]
    depth: usize,
}

impl KeyField {
    /// Field name on the model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route parameter name (or prefix, for nested hyperlinks).
    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// Type name of the field as declared.
    pub fn declared_type(&self) -> &'static str {
        self.declared_type
    }

    /// Type name of the key component this field packs into.
    pub fn key_type(&self) -> &'static str {
        self.key_type
    }

    /// Model referenced when the key component is a nested hyperlink.
    pub fn target(&self) -> Option<&'static str> {
        self.target
    }

    pub fn is_self_referential(&self) -> bool {
        self.self_referential
    }

    /// Whether the field was annotated, as opposed to the `id` fallback.
    pub fn is_explicit(&self) -> bool {
        self.is_explicit
    }

    /// Route parameters this field produces, flattened.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    #[cfg(test)]
    pub(crate) fn scalar<T: 'static>(name: &str) -> Self {
        let info = crate::schema::TypeInfo::of::<T>();
        Self {
            name: name.to_string(),
            param_name: name.to_string(),
            declared_type: info.name,
            key_type: info.name,
            key_type_id: info.type_id,
            target: None,
            self_referential: false,
            is_explicit: true,
            params: vec![name.to_string()],
            depth: 0,
        }
    }
}

/// Validated key description of one model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDescriptor {
    model: &'static str,
    details_view: String,
    fields: Vec<KeyField>,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    inherited_from: Option<&'static str>,
}

impl KeyDescriptor {
    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn details_view(&self) -> &str {
        &self.details_view
    }

    /// Key fields in declaration order.
    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }

    /// Levels of hyperlinks nested in this key.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Base model the key was inherited from, if any.
    pub fn inherited_from(&self) -> Option<&'static str> {
        self.inherited_from
    }

    /// All route parameters the key packs into, in field order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .flat_map(|field| field.params.iter().map(String::as_str))
    }

    /// Build the descriptor of the model `self_type` declared by `schema`,
    /// whose Rust key type has components `key_types`.
    pub(crate) fn build(
        schema: ModelSchema,
        self_type: TypeId,
        key_types: &[TypeId],
    ) -> Result<Self, ConfigError> {
        let model = schema.name;

        let mut seen = BTreeSet::new();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    model,
                    field: field.name.clone(),
                });
            }
            if field.keys.len() > 1 {
                return Err(ConfigError::RepeatedKeyAnnotation {
                    model,
                    field: field.name.clone(),
                });
            }
        }

        let parent = match schema.parent {
            Some(parent) => {
                if parent.type_id == self_type || registry::is_building(parent.type_id) {
                    return Err(ConfigError::CircularInheritance {
                        model,
                        parent: (parent.name)(),
                    });
                }
                Some((parent.descriptor)()?)
            }
            None => None,
        };

        let own_keys: Vec<&FieldSpec> = schema.fields.iter().filter(|f| f.is_key()).collect();
        let (fields, inherited_from) = match parent {
            Some(parent) if !own_keys.is_empty() => {
                return Err(ConfigError::DuplicateKey {
                    model,
                    parent: parent.model,
                });
            }
            Some(parent) => (parent.fields.clone(), Some(parent.model)),
            None if !own_keys.is_empty() => {
                let fields = own_keys
                    .iter()
                    .map(|field| key_field(model, self_type, field, &field.keys[0], true))
                    .collect::<Result<Vec<_>, _>>()?;
                (fields, None)
            }
            None => {
                let id = schema
                    .fields
                    .iter()
                    .find(|field| field.name == DEFAULT_KEY_FIELD)
                    .ok_or(ConfigError::MissingKey { model })?;
                (
                    vec![key_field(model, self_type, id, &PrimaryKey::new(), false)?],
                    None,
                )
            }
        };

        let details_view = schema
            .details_view
            .or_else(|| parent.map(|parent| parent.details_view.clone()))
            .ok_or(ConfigError::MissingDetailsView { model })?;

        check_key_types(model, &fields, key_types)?;

        let mut params = BTreeSet::new();
        for param in fields.iter().flat_map(|field| field.params.iter()) {
            if !params.insert(param.as_str()) {
                return Err(ConfigError::DuplicateParam {
                    model,
                    param: param.clone(),
                });
            }
        }

        let depth = fields.iter().map(|field| field.depth).max().unwrap_or(0);
        Ok(Self {
            model,
            details_view,
            fields,
            depth,
            inherited_from,
        })
    }
}

fn key_field(
    model: &'static str,
    self_type: TypeId,
    spec: &FieldSpec,
    key: &PrimaryKey,
    is_explicit: bool,
) -> Result<KeyField, ConfigError> {
    let param_name = key.name.clone().unwrap_or_else(|| spec.name.clone());
    match (spec.ty, key.key_type) {
        (FieldType::Href(target), Some(key_type)) if target.model == self_type => {
            let mut field = resolve_key_type(model, self_type, spec, key_type, param_name)?;
            field.self_referential = true;
            field.is_explicit = is_explicit;
            Ok(field)
        }
        (FieldType::Href(target), None) if target.model == self_type => {
            Err(ConfigError::CircularKey {
                model,
                field: spec.name.clone(),
                target: model,
            })
        }
        (_, Some(_)) => Err(ConfigError::UnexpectedKeyType {
            model,
            field: spec.name.clone(),
        }),
        (ty, None) => {
            let mut field = resolve_key_type(model, self_type, spec, ty, param_name)?;
            field.is_explicit = is_explicit;
            Ok(field)
        }
    }
}

fn resolve_key_type(
    model: &'static str,
    self_type: TypeId,
    spec: &FieldSpec,
    ty: FieldType,
    param_name: String,
) -> Result<KeyField, ConfigError> {
    match ty {
        FieldType::Value(info) => Ok(KeyField {
            name: spec.name.clone(),
            params: vec![param_name.clone()],
            param_name,
            declared_type: spec.ty.type_name(),
            key_type: info.name,
            key_type_id: info.type_id,
            target: None,
            self_referential: false,
            is_explicit: true,
            depth: 0,
        }),
        FieldType::Href(target) => {
            if target.model == self_type || registry::is_building(target.model) {
                return Err(ConfigError::CircularKey {
                    model,
                    field: spec.name.clone(),
                    target: (target.name)(),
                });
            }
            let inner = (target.descriptor)().map_err(|source| ConfigError::InvalidTarget {
                model,
                field: spec.name.clone(),
                source: Box::new(source),
            })?;
            let depth = inner.depth + 1;
            if depth > MAX_KEY_NESTING {
                return Err(ConfigError::NestingTooDeep {
                    model,
                    field: spec.name.clone(),
                    depth,
                    max: MAX_KEY_NESTING,
                });
            }
            Ok(KeyField {
                name: spec.name.clone(),
                params: inner
                    .params()
                    .map(|inner| format!("{param_name}_{inner}"))
                    .collect(),
                param_name,
                declared_type: spec.ty.type_name(),
                key_type: target.type_name,
                key_type_id: target.href,
                target: Some(inner.model),
                self_referential: false,
                is_explicit: true,
                depth,
            })
        }
    }
}

fn check_key_types(
    model: &'static str,
    fields: &[KeyField],
    key_types: &[TypeId],
) -> Result<(), ConfigError> {
    let expected = key_types.len();
    let declared = fields.len();
    if expected > 1 && declared < 2 {
        return Err(ConfigError::CompositeKeyArity {
            model,
            expected,
            declared,
        });
    }
    if expected != declared {
        return Err(ConfigError::KeyArity {
            model,
            expected,
            declared,
        });
    }
    for (position, (field, ty)) in fields.iter().zip(key_types).enumerate() {
        if field.key_type_id != *ty {
            return Err(ConfigError::KeyTypeMismatch {
                model,
                field: field.name.clone(),
                declared: field.key_type,
                position,
            });
        }
    }
    Ok(())
}
