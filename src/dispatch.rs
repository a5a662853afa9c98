//! Resolving and executing the behaviors configured for one member call.
//!
//! For a member with an addition `A`, a replacement `S` and default logic
//! `D`, one call runs:
//!
//! 1. `A`, unless it is marked `run_after`
//! 2. `S` if configured, otherwise `D` (the default is never validated)
//! 3. `A`, if it is marked `run_after` and step 2 completed
//!
//! Run-once entries are retired as soon as their invocation attempt ends,
//! including by panic. The store is never borrowed while a behavior runs,
//! so behaviors may call back into the mock.

use crate::behavior::{AddedBehavior, BehaviorEntry, ReplacementBehavior, RunOptions};
use crate::contract::Argument;
use crate::key::MemberKey;
use crate::logging;
use crate::mock::Behaviors;
use crate::store::BehaviorStore;
use crate::{ArgumentMismatchError, DispatchError};
use std::any::type_name;
use std::cell::RefCell;
use std::rc::Rc;

impl Behaviors {
    /// Dispatch a member call.
    ///
    /// Panics raised by the default, a replacement or an addition unwind
    /// through unchanged. The only failures raised here are the
    /// dispatcher's own ([`DispatchError`]), which panic with the full
    /// diagnostic message; use
    /// [`try_run_custom_behavior_or`](Self::try_run_custom_behavior_or) to
    /// receive them as values instead.
    pub fn run_custom_behavior_or<R, D>(&self, default: D, member: &MemberKey, args: &[Argument<'_>]) -> R
    where
        R: 'static,
        D: FnOnce() -> R,
    {
        match self.dispatch(default, member, args, |_| true) {
            Ok(result) => result,
            Err(e) => raise(e),
        }
    }

    /// Dispatch a member call, returning the dispatcher's own errors.
    pub fn try_run_custom_behavior_or<R, D>(
        &self,
        default: D,
        member: &MemberKey,
        args: &[Argument<'_>],
    ) -> Result<R, DispatchError>
    where
        R: 'static,
        D: FnOnce() -> R,
    {
        self.dispatch(default, member, args, |_| true)
    }

    /// Dispatch a call to a member that returns `Result`.
    ///
    /// An `Err` from the default or the replacement is returned as-is and
    /// counts as a failed call: a `run_after` addition does not run.
    pub fn run_fallible_behavior_or<T, E, D>(
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
        match self.dispatch(default, member, args, Result::is_ok) {
            Ok(result) => result,
            Err(e) => raise(e),
        }
    }

    fn dispatch<R, D>(
        &self,
        default: D,
        member: &MemberKey,
        args: &[Argument<'_>],
        completed: fn(&R) -> bool,
    ) -> Result<R, DispatchError>
    where
        R: 'static,
        D: FnOnce() -> R,
    {
        let (addition, replacement) = {
            let store = self.store.borrow();
            (store.addition(member), store.replacement(member))
        };
        logging::log_dispatch(member, addition.is_some(), replacement.is_some());

        let (before, after) = match addition {
            Some(addition) if addition.options().run_after => (None, Some(addition)),
            Some(addition) => (Some(addition), None),
            None => (None, None),
        };

        if let Some(addition) = &before {
            self.run_addition(addition, args)?;
        }

        let result = match &replacement {
            Some(replacement) => self.run_replacement::<R>(replacement, args)?,
            None => default(),
        };

        if let Some(addition) = &after {
            if completed(&result) {
                self.run_addition(addition, args)?;
            }
        }

        Ok(result)
    }

    fn run_addition(
        &self,
        addition: &Rc<AddedBehavior>,
        args: &[Argument<'_>],
    ) -> Result<(), ArgumentMismatchError> {
        let _retire = RunOnceGuard::new(&self.store, addition, BehaviorStore::remove_addition);
        addition.invoke(args, self.settings.arity)
    }

    fn run_replacement<R: 'static>(
        &self,
        replacement: &Rc<ReplacementBehavior>,
        args: &[Argument<'_>],
    ) -> Result<R, DispatchError> {
        let value = {
            let _retire =
                RunOnceGuard::new(&self.store, replacement, BehaviorStore::remove_replacement);
            replacement.invoke(args, self.settings.arity)?
        };

        value
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| DispatchError::ReturnTypeMismatch {
                member: replacement.member().to_string(),
                expected: type_name::<R>(),
                found: replacement.output(),
                defined_at: replacement.origin().to_string(),
            })
    }
}

fn raise(error: DispatchError) -> ! {
    logging::log_dispatch_failure(&error);
    panic!("{error}")
}

type Remove<O, Out> = fn(&mut BehaviorStore, &Rc<BehaviorEntry<O, Out>>) -> bool;

/// Retires a run-once entry when dropped, whether the invocation returned
/// or unwound.
struct RunOnceGuard<'a, O: RunOptions, Out> {
    store: &'a RefCell<BehaviorStore>,
    entry: &'a Rc<BehaviorEntry<O, Out>>,
    remove: Remove<O, Out>,
}

impl<'a, O: RunOptions, Out> RunOnceGuard<'a, O, Out> {
    fn new(
        store: &'a RefCell<BehaviorStore>,
        entry: &'a Rc<BehaviorEntry<O, Out>>,
        remove: Remove<O, Out>,
    ) -> Self {
        Self {
            store,
            entry,
            remove,
        }
    }
}

impl<O: RunOptions, Out> Drop for RunOnceGuard<'_, O, Out> {
    fn drop(&mut self) {
        if !self.entry.options().run_once() {
            return;
        }
        // A failed borrow here would otherwise panic inside an unwind.
        match self.store.try_borrow_mut() {
            Ok(mut store) => {
                if (self.remove)(&mut *store, self.entry) {
                    logging::log_run_once_retired(self.entry.member(), O::KIND);
                }
            }
            Err(_) => logging::log_run_once_skipped(self.entry.member()),
        }
    }
}
