use mock_override::{Behaviors, MemberKey, Mock};

/// Assertions over the behaviors configured on a mock.
pub struct BehaviorAssertions<'a> {
    behaviors: &'a Behaviors,
}

impl<'a> BehaviorAssertions<'a> {
    pub fn new(behaviors: &'a Behaviors) -> Self {
        Self { behaviors }
    }

    pub fn of<M: Mock>(mock: &'a M) -> Self {
        Self::new(mock.behaviors())
    }

    pub fn assert_replaced(&self, member: &MemberKey) {
        assert!(
            self.behaviors.has_replacement(member),
            "expected a replacement for `{member}`; configured: {}",
            self.describe()
        );
    }

    pub fn assert_added(&self, member: &MemberKey) {
        assert!(
            self.behaviors.has_addition(member),
            "expected an addition for `{member}`; configured: {}",
            self.describe()
        );
    }

    pub fn assert_not_overridden(&self, member: &MemberKey) {
        assert!(
            !self.behaviors.is_overridden(member),
            "expected no custom behavior for `{member}`; configured: {}",
            self.describe()
        );
    }

    /// Configured behaviors as JSON, for failure messages.
    pub fn describe(&self) -> String {
        self.behaviors
            .snapshot()
            .to_json()
            .unwrap_or_else(|e| format!("<unavailable: {e}>"))
    }
}
