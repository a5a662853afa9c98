use anyhow::{bail, Result};
use mock_override::{args, member_key, Behaviors, MemberKey, Mock};
use std::cell::RefCell;

pub trait Greeter {
    fn greet(&self) -> String;
    fn show(&self, id: u32);
    fn lookup(&self, name: &str) -> Result<u32>;
}

/// Greets the user and shows records through a `Greeter`.
pub fn welcome(greeter: &dyn Greeter, name: &str) -> Result<String> {
    let id = greeter.lookup(name)?;
    greeter.show(id);
    Ok(format!("{} #{id}", greeter.greet()))
}

/// `Greeter` double whose members tests can override.
#[derive(Default)]
pub struct GreeterMock {
    behaviors: Behaviors,
    pub shown: RefCell<Vec<u32>>,
}

impl Mock for GreeterMock {
    fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }
}

impl GreeterMock {
    pub fn greet_key() -> MemberKey {
        member_key!(GreeterMock::greet() -> String)
    }

    pub fn show_key() -> MemberKey {
        member_key!(GreeterMock::show(u32))
    }

    pub fn lookup_key() -> MemberKey {
        member_key!(GreeterMock::lookup(String) -> Result<u32>)
    }
}

impl Greeter for GreeterMock {
    fn greet(&self) -> String {
        self.run_custom_behavior_or(|| "Howdy!".to_string(), &Self::greet_key(), &[])
    }

    fn show(&self, id: u32) {
        self.run_custom_behavior_or(
            || self.shown.borrow_mut().push(id),
            &Self::show_key(),
            &args![id],
        )
    }

    fn lookup(&self, name: &str) -> Result<u32> {
        let name = name.to_string();
        self.run_fallible_behavior_or(
            || {
                if name.is_empty() {
                    bail!("no user with an empty name");
                }
                Ok(u32::try_from(name.len())?)
            },
            &Self::lookup_key(),
            &args![name],
        )
    }
}
