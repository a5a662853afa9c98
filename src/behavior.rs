//! Configured behaviors and their run options.
//!
//! Any `Fn(&A, &B, ..) -> R + 'static` up to six parameters is a
//! [`Behavior`]. Registration erases it into a [`BehaviorEntry`]: the
//! descriptor list captured from its signature plus a callable over a
//! validated argument slice.

use crate::contract::{self, ArgType, Argument, ArityPolicy, ContractViolation};
use crate::key::MemberKey;
use crate::ArgumentMismatchError;
use serde::Serialize;
use std::any::{type_name, Any};
use std::cell::Cell;
use std::fmt;
use std::panic::Location;
use std::rc::Rc;

/// Custom logic that can stand in for, or run alongside, a member.
///
/// `Params` is the tuple of parameter types; the closure receives each
/// argument by reference.
pub trait Behavior<Params, R>: 'static {
    /// Expected argument types, in declaration order.
    fn parameters() -> Vec<ArgType>;

    /// Invoke with exactly the declared number of arguments.
    fn call(&self, args: &[Argument<'_>]) -> Result<R, ContractViolation>;
}

fn parameter<'a, T: Any>(
    args: &[Argument<'a>],
    position: usize,
    declared: usize,
) -> Result<&'a T, ContractViolation> {
    let argument = args.get(position).ok_or(ContractViolation::TooManyParameters {
        declared,
        supplied: args.len(),
    })?;
    argument
        .downcast_ref::<T>()
        .ok_or_else(|| ContractViolation::type_mismatch(position, ArgType::of::<T>(), argument))
}

macro_rules! impl_behavior {
    ($count:expr; $($param:ident $position:tt),*) => {
        impl<F, R, $($param: Any),*> Behavior<($($param,)*), R> for F
        where
            F: Fn($(&$param),*) -> R + 'static,
        {
            fn parameters() -> Vec<ArgType> {
                vec![$(ArgType::of::<$param>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn call(&self, args: &[Argument<'_>]) -> Result<R, ContractViolation> {
                $(let $param = parameter::<$param>(args, $position, $count)?;)*
                Ok(self($($param),*))
            }
        }
    };
}

impl_behavior!(0;);
impl_behavior!(1; A 0);
impl_behavior!(2; A 0, B 1);
impl_behavior!(3; A 0, B 1, C 2);
impl_behavior!(4; A 0, B 1, C 2, D 3);
impl_behavior!(5; A 0, B 1, C 2, D 3, E 4);
impl_behavior!(6; A 0, B 1, C 2, D 3, E 4, G 5);

/// Where a behavior was registered, used to point at a misconfiguration.
#[derive(Clone, Copy, Debug)]
pub struct Origin {
    location: &'static Location<'static>,
    behavior: &'static str,
}

impl Origin {
    pub(crate) fn new(location: &'static Location<'static>, behavior: &'static str) -> Self {
        Self { location, behavior }
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Type name of the registered closure or function.
    pub fn behavior(&self) -> &'static str {
        self.behavior
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)
    }
}

/// Options for a behavior added alongside the default logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AddOptions {
    /// Remove the behavior after its first invocation.
    pub run_once: bool,
    /// Run after the default or replacement logic instead of before it.
    pub run_after: bool,
}

/// Options for a behavior replacing the default logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SetOptions {
    /// Remove the behavior after its first invocation.
    pub run_once: bool,
}

/// Options shared by every kind of behavior.
pub trait RunOptions: Copy {
    /// Kind of behavior these options belong to, for diagnostics.
    const KIND: &'static str;

    fn run_once(&self) -> bool;
}

impl RunOptions for AddOptions {
    const KIND: &'static str = "addition";

    fn run_once(&self) -> bool {
        self.run_once
    }
}

impl RunOptions for SetOptions {
    const KIND: &'static str = "replacement";

    fn run_once(&self) -> bool {
        self.run_once
    }
}

type ErasedCall<Out> = Box<dyn Fn(&[Argument<'_>]) -> Result<Out, ContractViolation>>;

/// A registered behavior for one member.
pub struct BehaviorEntry<O, Out> {
    member: MemberKey,
    parameters: Vec<ArgType>,
    output: &'static str,
    call: ErasedCall<Out>,
    options: Cell<O>,
    origin: Origin,
}

impl<O: fmt::Debug + Copy, Out> fmt::Debug for BehaviorEntry<O, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorEntry")
            .field("member", &self.member)
            .field("parameters", &self.parameters)
            .field("output", &self.output)
            .field("options", &self.options.get())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Logic that substitutes for the member's default.
pub type ReplacementBehavior = BehaviorEntry<SetOptions, Box<dyn Any>>;

/// Logic that runs before or after the member's default or replacement.
pub type AddedBehavior = BehaviorEntry<AddOptions, ()>;

impl<O: RunOptions, Out> BehaviorEntry<O, Out> {
    pub fn member(&self) -> &MemberKey {
        &self.member
    }

    pub fn parameters(&self) -> &[ArgType] {
        &self.parameters
    }

    pub fn options(&self) -> O {
        self.options.get()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Type name of the value the behavior produces.
    pub fn output(&self) -> &'static str {
        self.output
    }

    /// Validate `args` and forward the leading ones the behavior declares.
    pub(crate) fn invoke(
        &self,
        args: &[Argument<'_>],
        policy: ArityPolicy,
    ) -> Result<Out, ArgumentMismatchError> {
        let taken = contract::validate(args, &self.parameters, policy)
            .map_err(|violation| self.mismatch(violation))?;
        (self.call)(&args[..taken]).map_err(|violation| self.mismatch(violation))
    }

    fn mismatch(&self, violation: ContractViolation) -> ArgumentMismatchError {
        ArgumentMismatchError {
            member: self.member.to_string(),
            behavior: self.origin.behavior(),
            defined_at: self.origin.to_string(),
            violation,
        }
    }
}

impl ReplacementBehavior {
    pub(crate) fn replacement<P, R, F>(member: MemberKey, behavior: F, origin: Origin) -> Self
    where
        R: 'static,
        F: Behavior<P, R>,
    {
        Self {
            member,
            parameters: F::parameters(),
            output: type_name::<R>(),
            call: Box::new(move |args: &[Argument<'_>]| {
                Behavior::call(&behavior, args).map(|value| Box::new(value) as Box<dyn Any>)
            }),
            options: Cell::new(SetOptions::default()),
            origin,
        }
    }
}

impl AddedBehavior {
    pub(crate) fn addition<P, F>(member: MemberKey, behavior: F, origin: Origin) -> Self
    where
        F: Behavior<P, ()>,
    {
        Self {
            member,
            parameters: F::parameters(),
            output: type_name::<()>(),
            call: Box::new(move |args: &[Argument<'_>]| Behavior::call(&behavior, args)),
            options: Cell::new(AddOptions::default()),
            origin,
        }
    }
}

/// Returned from registration so run options can be chained.
///
/// Options are read at dispatch time, so changing them through a handle
/// after registration still takes effect. A handle to an entry that has
/// since been overwritten or retired changes nothing.
pub struct BehaviorHandle<O, Out> {
    entry: Rc<BehaviorEntry<O, Out>>,
}

impl<O: fmt::Debug + Copy, Out> fmt::Debug for BehaviorHandle<O, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorHandle")
            .field("member", &self.entry.member)
            .field("options", &self.entry.options.get())
            .finish()
    }
}

pub type AddedBehaviorHandle = BehaviorHandle<AddOptions, ()>;
pub type ReplacementHandle = BehaviorHandle<SetOptions, Box<dyn Any>>;

impl<O: RunOptions, Out> BehaviorHandle<O, Out> {
    pub(crate) fn new(entry: Rc<BehaviorEntry<O, Out>>) -> Self {
        Self { entry }
    }

    pub fn with_options(self, configure: impl FnOnce(&mut O)) -> Self {
        let mut options = self.entry.options.get();
        configure(&mut options);
        self.entry.options.set(options);
        self
    }

    pub fn options(&self) -> O {
        self.entry.options()
    }

    pub fn member(&self) -> &MemberKey {
        self.entry.member()
    }

    pub fn origin(&self) -> Origin {
        self.entry.origin()
    }
}

impl AddedBehaviorHandle {
    pub fn run_once(self) -> Self {
        self.with_options(|options| options.run_once = true)
    }

    pub fn run_after(self) -> Self {
        self.with_options(|options| options.run_after = true)
    }
}

impl ReplacementHandle {
    pub fn run_once(self) -> Self {
        self.with_options(|options| options.run_once = true)
    }
}
