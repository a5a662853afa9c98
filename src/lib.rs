//! Behavior overrides for hand-written test doubles.
//!
//! A test double opts in by owning a [`Behaviors`] value and implementing
//! [`Mock`]. Each overridable member body is a single call to
//! [`Mock::run_custom_behavior_or`], passing its default logic, its own
//! [`MemberKey`] and its arguments in declaration order. Tests then either
//! add logic that runs alongside the default ([`Mock::add_behavior`]) or
//! replace the default outright ([`Mock::set_behavior`]).
//!
//! ```ignore
//! struct GreeterMock {
//!     behaviors: Behaviors,
//! }
//!
//! impl Mock for GreeterMock {
//!     fn behaviors(&self) -> &Behaviors {
//!         &self.behaviors
//!     }
//! }
//!
//! impl GreeterMock {
//!     fn greet(&self, name: String) -> String {
//!         self.run_custom_behavior_or(
//!             || format!("Howdy, {name}!"),
//!             &member_key!(GreeterMock::greet(String) -> String),
//!             &args![name],
//!         )
//!     }
//! }
//! ```

pub mod behavior;
pub mod config;
pub mod contract;
pub mod dispatch;
pub mod key;
pub mod logging;
pub mod mock;
pub mod store;

use miette::Diagnostic;

pub use behavior::{
    AddOptions, AddedBehaviorHandle, Behavior, BehaviorHandle, Origin, ReplacementHandle,
    SetOptions,
};
pub use config::{Config, DispatchSettings, LoggingConfig};
pub use contract::{ArgType, Argument, ArityPolicy, ContractViolation};
pub use key::MemberKey;
pub use mock::{Behaviors, Mock};
pub use store::{EntrySummary, StoreSnapshot};

/// Result type alias for fallible crate operations outside dispatch
pub type Result<T> = miette::Result<T>;

/// A malformed configuration call, reported at the call site.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConstructionError {
    #[error("member key must not be blank")]
    #[diagnostic(
        code(mock_override::blank_member_key),
        help("Name the member explicitly with `MemberKey::named`, or build the key with `member_key!`.")
    )]
    BlankMemberKey,

    #[error("replacement for `{member}` returns `{found}` but the member returns `{expected}`")]
    #[diagnostic(
        code(mock_override::return_type_conflict),
        help("A replacement must produce exactly the member's return type.")
    )]
    ReturnTypeConflict {
        member: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A configured behavior cannot consume the arguments a member supplied.
///
/// Raised at dispatch time, which can be far from where the behavior was
/// registered, so it carries the registration site and the behavior's type.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error(
    "custom behavior for `{member}` cannot accept the member's arguments: {violation} \
     (behavior `{behavior}` defined at {defined_at})"
)]
#[diagnostic(
    code(mock_override::argument_mismatch),
    help("Declare the behavior's parameters in the member's order and with the member's argument types. Trailing parameters may be left out.")
)]
pub struct ArgumentMismatchError {
    pub member: String,
    pub behavior: &'static str,
    pub defined_at: String,
    pub violation: ContractViolation,
}

/// Errors raised by the dispatcher itself. Behavior failures are never
/// wrapped in this type.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum DispatchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ArgumentMismatch(#[from] ArgumentMismatchError),

    #[error(
        "replacement for `{member}` returned `{found}` but the member expects `{expected}` \
         (behavior defined at {defined_at})"
    )]
    #[diagnostic(
        code(mock_override::return_type_mismatch),
        help("Build the member key with a signature (`member_key!(Type::member(..) -> Ret)`) to catch this when the behavior is registered.")
    )]
    ReturnTypeMismatch {
        member: String,
        expected: &'static str,
        found: &'static str,
        defined_at: String,
    },
}

/// Configuration file errors
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    #[diagnostic(
        code(mock_override::config_read_failed),
        help("Check that the file exists and is readable, or unset MOCK_OVERRIDE_CONFIG.")
    )]
    Read { path: String, message: String },

    #[error("Failed to parse TOML config from {path}: {message}")]
    #[diagnostic(
        code(mock_override::config_parse_failed),
        help("Valid sections are [dispatch] (arity = \"allow-fewer\" | \"exact\") and [logging] (filter, json).")
    )]
    Parse { path: String, message: String },
}
