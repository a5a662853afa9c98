//! Member identification.
//!
//! A [`MemberKey`] names exactly one overload of one member. Keys are built
//! either from an explicit literal ([`MemberKey::named`]) or from a name plus
//! the member's static signature ([`MemberKey::of`], [`member_key!`]). Two
//! overloads that share a name differ in their signature, so their keys
//! never collide.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable, overload-discriminating identifier for one mockable member.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MemberKey {
    name: String,
    signature: Option<Signature>,
}

/// Identity is the pair of `TypeId`s; the names are for display only.
#[derive(Clone, Debug)]
struct Signature {
    parameters_id: TypeId,
    return_id: TypeId,
    parameters: &'static str,
    returns: &'static str,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.parameters_id == other.parameters_id && self.return_id == other.return_id
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parameters_id.hash(state);
        self.return_id.hash(state);
    }
}

impl MemberKey {
    /// Key identified by an explicit name only.
    ///
    /// The caller is responsible for keeping overloads apart, e.g. by
    /// spelling the parameter list into the name (`"show(u32)"`).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: None,
        }
    }

    /// Key identified by name, parameter tuple `P` and return type `R`.
    ///
    /// ```ignore
    /// let by_id = MemberKey::of::<(u32,), String>("Repo::find");
    /// let by_name = MemberKey::of::<(String,), String>("Repo::find");
    /// assert_ne!(by_id, by_name);
    /// ```
    pub fn of<P: 'static, R: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: Some(Signature {
                parameters_id: TypeId::of::<P>(),
                return_id: TypeId::of::<R>(),
                parameters: type_name::<P>(),
                returns: type_name::<R>(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// The member's declared return type, when the key carries a signature.
    pub fn return_type(&self) -> Option<(TypeId, &'static str)> {
        self.signature
            .as_ref()
            .map(|signature| (signature.return_id, signature.returns))
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signature {
            Some(signature) => write!(
                f,
                "{}{} -> {}",
                self.name, signature.parameters, signature.returns
            ),
            None => f.write_str(&self.name),
        }
    }
}

/// Build a [`MemberKey`] qualified with the calling module's path.
///
/// ```ignore
/// member_key!(Greeter::greet);                     // name only
/// member_key!(Greeter::greet() -> String);         // with signature
/// member_key!(Greeter::show(u32));                 // returns ()
/// ```
#[macro_export]
macro_rules! member_key {
    ($($segment:ident)::+ ( $($param:ty),* $(,)? ) -> $ret:ty) => {
        $crate::MemberKey::of::<($($param,)*), $ret>(
            concat!(module_path!() $(, "::", stringify!($segment))+)
        )
    };
    ($($segment:ident)::+ ( $($param:ty),* $(,)? )) => {
        $crate::MemberKey::of::<($($param,)*), ()>(
            concat!(module_path!() $(, "::", stringify!($segment))+)
        )
    };
    ($($segment:ident)::+) => {
        $crate::MemberKey::named(concat!(module_path!() $(, "::", stringify!($segment))+))
    };
}
