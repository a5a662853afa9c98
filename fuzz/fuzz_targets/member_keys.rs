#![no_main]

use libfuzzer_sys::fuzz_target;
use mock_override::{Behaviors, DispatchSettings, MemberKey};

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let behaviors = Behaviors::with_settings(DispatchSettings::default());
        let member = MemberKey::named(name);
        let registered = behaviors.add_behavior(member.clone(), || {}).is_ok();
        assert_eq!(registered, !name.trim().is_empty());
        assert_eq!(behaviors.has_addition(&member), registered);
    }
});
