pub mod assertions;
pub mod panics;
pub mod recorder;

pub use assertions::BehaviorAssertions;
pub use panics::{panic_message, panic_payload};
pub use recorder::{CallOrder, Counter};
