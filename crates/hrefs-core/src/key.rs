//! Model keys and their packing into route parameters.
//!
//! A key is either a single [`KeyPart`] or a tuple of parts (a composite key).
//! Packing walks the descriptor's key fields in declaration order and writes
//! each part under that field's route parameter name. Unpacking reads by
//! name, so the order parameters were inserted in never matters.

use crate::descriptor::KeyField;
use crate::error::{HrefError, ResolveError};
use crate::href::Href;
use crate::referrable::Referrable;
use crate::resolver::Params;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::fmt::Debug;
use std::hash::Hash;

/// One component of a model key.
pub trait KeyPart: Clone + Eq + Hash + Debug + Send + Sync + DeserializeOwned + 'static {
    /// Write this part under `name`.
    fn write_param(&self, name: &str, params: &mut Params) -> Result<(), HrefError>;

    /// Read this part back from `name`.
    fn read_param(name: &str, params: &Params) -> Result<Self, HrefError>;
}

/// The whole key of a referrable model.
pub trait ModelKey: Clone + Eq + Hash + Debug + Send + Sync + DeserializeOwned + 'static {
    /// Type of each component, in declaration order.
    fn part_types() -> Vec<TypeId>;

    /// Pack the key into route parameters, one part per key field.
    fn write_params(&self, fields: &[KeyField], params: &mut Params) -> Result<(), HrefError>;

    /// Unpack the key from route parameters.
    fn read_params(fields: &[KeyField], params: &Params) -> Result<Self, HrefError>;
}

fn check_arity(fields: &[KeyField], expected: usize) -> Result<(), HrefError> {
    if fields.len() != expected {
        return Err(ResolveError::KeyArity {
            expected,
            actual: fields.len(),
        }
        .into());
    }
    Ok(())
}

fn required_param<'a>(name: &str, params: &'a Params) -> Result<&'a String, HrefError> {
    params.get(name).ok_or_else(|| {
        ResolveError::MissingParam {
            param: name.to_string(),
        }
        .into()
    })
}

macro_rules! scalar_key {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl KeyPart for $ty {
                fn write_param(&self, name: &str, params: &mut Params) -> Result<(), HrefError> {
                    params.insert(name.to_string(), self.to_string());
                    Ok(())
                }

                fn read_param(name: &str, params: &Params) -> Result<Self, HrefError> {
                    let raw = required_param(name, params)?;
                    raw.parse::<$ty>().map_err(|_| {
                        ResolveError::InvalidParam {
                            param: name.to_string(),
                            value: raw.clone(),
                            expected: stringify!($ty),
                        }
                        .into()
                    })
                }
            }

            impl ModelKey for $ty {
                fn part_types() -> Vec<TypeId> {
                    vec![TypeId::of::<Self>()]
                }

                fn write_params(&self, fields: &[KeyField], params: &mut Params) -> Result<(), HrefError> {
                    check_arity(fields, 1)?;
                    self.write_param(fields[0].param_name(), params)
                }

                fn read_params(fields: &[KeyField], params: &Params) -> Result<Self, HrefError> {
                    check_arity(fields, 1)?;
                    Self::read_param(fields[0].param_name(), params)
                }
            }
        )+
    };
}

scalar_key!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, String, uuid::Uuid,
);

/// A hyperlink used as a key part contributes its target's parameters,
/// prefixed with the field's parameter name (`book` + `id` → `book_id`).
impl<T: Referrable> KeyPart for Href<T> {
    fn write_param(&self, name: &str, params: &mut Params) -> Result<(), HrefError> {
        for (inner, value) in T::key_to_params(self.key())? {
            params.insert(format!("{name}_{inner}"), value);
        }
        Ok(())
    }

    fn read_param(name: &str, params: &Params) -> Result<Self, HrefError> {
        let prefix = format!("{name}_");
        let inner: Params = params
            .iter()
            .filter_map(|(param, value)| {
                param
                    .strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        let key = T::params_to_key(&inner).map_err(|err| match err {
            HrefError::Resolve(ResolveError::MissingParam { param }) => {
                HrefError::Resolve(ResolveError::MissingParam {
                    param: format!("{prefix}{param}"),
                })
            }
            other => other,
        })?;
        Ok(Href::from_key(key))
    }
}

impl<T: Referrable> ModelKey for Href<T> {
    fn part_types() -> Vec<TypeId> {
        vec![TypeId::of::<Self>()]
    }

    fn write_params(&self, fields: &[KeyField], params: &mut Params) -> Result<(), HrefError> {
        check_arity(fields, 1)?;
        self.write_param(fields[0].param_name(), params)
    }

    fn read_params(fields: &[KeyField], params: &Params) -> Result<Self, HrefError> {
        check_arity(fields, 1)?;
        Self::read_param(fields[0].param_name(), params)
    }
}

macro_rules! composite_key {
    ($($part:ident : $idx:tt),+) => {
        impl<$($part: KeyPart),+> ModelKey for ($($part,)+) {
            fn part_types() -> Vec<TypeId> {
                vec![$(TypeId::of::<$part>()),+]
            }

            fn write_params(&self, fields: &[KeyField], params: &mut Params) -> Result<(), HrefError> {
                check_arity(fields, Self::part_types().len())?;
                $(self.$idx.write_param(fields[$idx].param_name(), params)?;)+
                Ok(())
            }

            fn read_params(fields: &[KeyField], params: &Params) -> Result<Self, HrefError> {
                check_arity(fields, Self::part_types().len())?;
                Ok(($($part::read_param(fields[$idx].param_name(), params)?,)+))
            }
        }
    };
}

composite_key!(A: 0, B: 1);
composite_key!(A: 0, B: 1, C: 2);
composite_key!(A: 0, B: 1, C: 2, D: 3);
