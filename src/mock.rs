//! The surface a hand-written test double opts in to.

use crate::behavior::{
    AddOptions, AddedBehavior, AddedBehaviorHandle, Behavior, BehaviorHandle, Origin,
    ReplacementBehavior, ReplacementHandle, RunOptions, SetOptions,
};
use crate::config::{Config, DispatchSettings};
use crate::contract::Argument;
use crate::key::MemberKey;
use crate::logging;
use crate::store::{BehaviorStore, StoreSnapshot};
use crate::{ConstructionError, DispatchError};
use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::panic::Location;
use std::rc::Rc;

/// Custom behaviors configured on one mock instance.
///
/// Owned by the mock and dropped with it. Not thread-safe: give each test
/// its own mock.
pub struct Behaviors {
    pub(crate) store: RefCell<BehaviorStore>,
    pub(crate) settings: DispatchSettings,
}

impl Default for Behaviors {
    fn default() -> Self {
        Self::with_settings(Config::shared().dispatch)
    }
}

impl Behaviors {
    /// Empty store using the project configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DispatchSettings) -> Self {
        Self {
            store: RefCell::new(BehaviorStore::new()),
            settings,
        }
    }

    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Run `behavior` alongside `member`'s default or replacement logic.
    ///
    /// The behavior runs before that logic unless the returned handle is
    /// switched to [`run_after`](AddedBehaviorHandle::run_after). Registering
    /// again for the same member overwrites the earlier addition.
    #[track_caller]
    pub fn add_behavior<P, F>(
        &self,
        member: MemberKey,
        behavior: F,
    ) -> Result<AddedBehaviorHandle, ConstructionError>
    where
        F: Behavior<P, ()>,
    {
        let origin = Origin::new(Location::caller(), type_name::<F>());
        ensure_named(&member)?;

        let entry = Rc::new(AddedBehavior::addition(member, behavior, origin));
        let overwrote = self.store.borrow_mut().set_addition(entry.clone());
        logging::log_behavior_registered(entry.member(), AddOptions::KIND, origin, overwrote);

        Ok(BehaviorHandle::new(entry))
    }

    /// Replace `member`'s default logic with `behavior`.
    ///
    /// Registering again for the same member overwrites the earlier
    /// replacement.
    #[track_caller]
    pub fn set_behavior<P, R, F>(
        &self,
        member: MemberKey,
        behavior: F,
    ) -> Result<ReplacementHandle, ConstructionError>
    where
        R: 'static,
        F: Behavior<P, R>,
    {
        let origin = Origin::new(Location::caller(), type_name::<F>());
        ensure_named(&member)?;
        if let Some((expected_id, expected)) = member.return_type() {
            if expected_id != TypeId::of::<R>() {
                let err = ConstructionError::ReturnTypeConflict {
                    member: member.to_string(),
                    expected,
                    found: type_name::<R>(),
                };
                logging::log_construction_rejected(&member, &err);
                return Err(err);
            }
        }

        let entry = Rc::new(ReplacementBehavior::replacement(member, behavior, origin));
        let overwrote = self.store.borrow_mut().set_replacement(entry.clone());
        logging::log_behavior_registered(entry.member(), SetOptions::KIND, origin, overwrote);

        Ok(BehaviorHandle::new(entry))
    }

    pub fn has_addition(&self, member: &MemberKey) -> bool {
        self.store.borrow().addition(member).is_some()
    }

    pub fn has_replacement(&self, member: &MemberKey) -> bool {
        self.store.borrow().replacement(member).is_some()
    }

    /// Whether any custom behavior is configured for `member`.
    pub fn is_overridden(&self, member: &MemberKey) -> bool {
        self.has_addition(member) || self.has_replacement(member)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.borrow().snapshot()
    }
}

fn ensure_named(member: &MemberKey) -> Result<(), ConstructionError> {
    if member.is_blank() {
        let err = ConstructionError::BlankMemberKey;
        logging::log_construction_rejected(member, &err);
        return Err(err);
    }
    Ok(())
}

/// A test double whose members can be overridden at test time.
///
/// Implementors only provide [`behaviors`](Mock::behaviors); every
/// overridable member body is a single call to
/// [`run_custom_behavior_or`](Mock::run_custom_behavior_or) with the
/// member's default logic, its own key, and its arguments in declaration
/// order. Reordering arguments of the same type goes unnoticed by
/// validation and silently feeds behaviors the wrong values.
pub trait Mock {
    fn behaviors(&self) -> &Behaviors;

    /// See [`Behaviors::add_behavior`].
    #[track_caller]
    fn add_behavior<P, F>(
        &self,
        member: MemberKey,
        behavior: F,
    ) -> Result<AddedBehaviorHandle, ConstructionError>
    where
        F: Behavior<P, ()>,
    {
        self.behaviors().add_behavior(member, behavior)
    }

    /// See [`Behaviors::set_behavior`].
    #[track_caller]
    fn set_behavior<P, R, F>(
        &self,
        member: MemberKey,
        behavior: F,
    ) -> Result<ReplacementHandle, ConstructionError>
    where
        R: 'static,
        F: Behavior<P, R>,
    {
        self.behaviors().set_behavior(member, behavior)
    }

    /// See [`Behaviors::run_custom_behavior_or`].
    fn run_custom_behavior_or<R, D>(&self, default: D, member: &MemberKey, args: &[Argument<'_>]) -> R
    where
        R: 'static,
        D: FnOnce() -> R,
    {
        self.behaviors().run_custom_behavior_or(default, member, args)
    }

    /// See [`Behaviors::try_run_custom_behavior_or`].
    fn try_run_custom_behavior_or<R, D>(
        &self,
        default: D,
        member: &MemberKey,
        args: &[Argument<'_>],
    ) -> Result<R, DispatchError>
    where
        R: 'static,
        D: FnOnce() -> R,
    {
        self.behaviors().try_run_custom_behavior_or(default, member, args)
    }

    /// See [`Behaviors::run_fallible_behavior_or`].
    fn run_fallible_behavior_or<T, E, D>(
        &self,
        default: D,
        member: &MemberKey,
        args: &[Argument<'_>],
    ) -> Result<T, E>
    where
        T: 'static,
        E: 'static,
        D: FnOnce() -> Result<T, E>,
    {
        self.behaviors().run_fallible_behavior_or(default, member, args)
    }
}
