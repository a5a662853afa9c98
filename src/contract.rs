//! Argument contract validation.
//!
//! A member hands the dispatcher its runtime arguments as a slice of
//! [`Argument`]s; a registered behavior carries the ordered [`ArgType`]
//! descriptors captured from its own signature. [`validate`] decides whether
//! the arguments can be forwarded and how many of them the behavior takes.
//!
//! Rust has no null. The absent value is `Option::None`, which is an
//! instance of `Option<T>`, so a behavior declaring `&Option<T>` accepts
//! `None` through the ordinary type rule.

use serde::{Deserialize, Serialize};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use thiserror::Error;

/// One expected parameter type of a configured behavior.
#[derive(Clone, Copy, Debug)]
pub struct ArgType {
    id: TypeId,
    name: &'static str,
}

impl ArgType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `argument` is an instance of this type.
    pub fn accepts(&self, argument: &Argument<'_>) -> bool {
        argument.type_id() == self.id
    }
}

impl PartialEq for ArgType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ArgType {}

/// A runtime argument supplied by a member, borrowed for one dispatch.
#[derive(Clone, Copy)]
pub struct Argument<'a> {
    value: &'a dyn Any,
    id: TypeId,
    type_name: &'static str,
}

impl<'a> Argument<'a> {
    pub fn of<T: Any>(value: &'a T) -> Self {
        Self {
            value,
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Argument").field(&self.type_name).finish()
    }
}

/// Build the argument vector for a dispatch from a member's parameters.
///
/// Arguments are borrowed, so the default-logic closure can keep borrowing
/// the same parameters.
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        [$($crate::Argument::of(&$value)),*]
    };
}

/// How strictly a behavior's parameter count must match the member's arity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArityPolicy {
    /// A behavior may leave out trailing parameters; those arguments are
    /// dropped unchecked.
    #[default]
    AllowFewer,
    /// A behavior must declare every argument the member supplies.
    Exact,
}

/// Which part of the argument contract a behavior failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("behavior declares {declared} parameters but the member supplies {supplied}")]
    TooManyParameters { declared: usize, supplied: usize },

    #[error("behavior declares {declared} parameters but exact arity requires all {supplied}")]
    MissingParameters { declared: usize, supplied: usize },

    #[error("parameter {position} expects `{expected}` but the member supplies `{actual}`")]
    TypeMismatch {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },
}

impl ContractViolation {
    pub(crate) fn type_mismatch(position: usize, expected: ArgType, actual: &Argument<'_>) -> Self {
        ContractViolation::TypeMismatch {
            position,
            expected: expected.name(),
            actual: actual.type_name(),
        }
    }
}

/// Check `args` against `expected` and return how many leading arguments
/// the behavior consumes.
///
/// Only the first `expected.len()` arguments are type-checked; anything
/// after them is never looked at.
pub fn validate(
    args: &[Argument<'_>],
    expected: &[ArgType],
    policy: ArityPolicy,
) -> Result<usize, ContractViolation> {
    if expected.len() > args.len() {
        return Err(ContractViolation::TooManyParameters {
            declared: expected.len(),
            supplied: args.len(),
        });
    }
    if policy == ArityPolicy::Exact && expected.len() < args.len() {
        return Err(ContractViolation::MissingParameters {
            declared: expected.len(),
            supplied: args.len(),
        });
    }

    for (position, (argument, expected)) in args.iter().zip(expected).enumerate() {
        if !expected.accepts(argument) {
            return Err(ContractViolation::type_mismatch(position, *expected, argument));
        }
    }

    Ok(expected.len())
}
