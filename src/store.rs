//! Per-mock storage of configured behaviors.

use crate::behavior::{AddedBehavior, BehaviorEntry, ReplacementBehavior, RunOptions};
use crate::key::MemberKey;
use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;

/// At most one replacement and one addition per member.
///
/// Entries are shared through `Rc` so a dispatch can keep using an entry
/// after releasing its borrow of the store.
#[derive(Default)]
pub struct BehaviorStore {
    replacements: HashMap<MemberKey, Rc<ReplacementBehavior>>,
    additions: HashMap<MemberKey, Rc<AddedBehavior>>,
}

impl BehaviorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns whether an earlier entry was replaced.
    pub fn set_replacement(&mut self, entry: Rc<ReplacementBehavior>) -> bool {
        self.replacements
            .insert(entry.member().clone(), entry)
            .is_some()
    }

    /// Insert or overwrite; returns whether an earlier entry was replaced.
    pub fn set_addition(&mut self, entry: Rc<AddedBehavior>) -> bool {
        self.additions.insert(entry.member().clone(), entry).is_some()
    }

    pub fn replacement(&self, member: &MemberKey) -> Option<Rc<ReplacementBehavior>> {
        self.replacements.get(member).cloned()
    }

    pub fn addition(&self, member: &MemberKey) -> Option<Rc<AddedBehavior>> {
        self.additions.get(member).cloned()
    }

    pub fn remove_replacement(&mut self, entry: &Rc<ReplacementBehavior>) -> bool {
        remove_if_current(&mut self.replacements, entry)
    }

    pub fn remove_addition(&mut self, entry: &Rc<AddedBehavior>) -> bool {
        remove_if_current(&mut self.additions, entry)
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty() && self.additions.is_empty()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let mut replacements: Vec<EntrySummary> = self
            .replacements
            .values()
            .map(|entry| EntrySummary::from_entry(entry, None))
            .collect();
        let mut additions: Vec<EntrySummary> = self
            .additions
            .values()
            .map(|entry| EntrySummary::from_entry(entry, Some(entry.options().run_after)))
            .collect();
        replacements.sort_by(|a, b| a.member.cmp(&b.member));
        additions.sort_by(|a, b| a.member.cmp(&b.member));

        StoreSnapshot {
            replacements,
            additions,
        }
    }
}

/// Remove `entry` only while it is still the one stored for its member, so
/// retiring an entry never drops a newer one registered in the meantime.
fn remove_if_current<O: RunOptions, Out>(
    entries: &mut HashMap<MemberKey, Rc<BehaviorEntry<O, Out>>>,
    entry: &Rc<BehaviorEntry<O, Out>>,
) -> bool {
    match entries.get(entry.member()) {
        Some(current) if Rc::ptr_eq(current, entry) => {
            entries.remove(entry.member());
            true
        }
        _ => false,
    }
}

/// Serializable view of the configured behaviors of one mock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub replacements: Vec<EntrySummary>,
    pub additions: Vec<EntrySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub member: String,
    pub parameters: Vec<&'static str>,
    pub run_once: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_after: Option<bool>,
    pub defined_at: String,
}

impl EntrySummary {
    fn from_entry<O: RunOptions, Out>(entry: &BehaviorEntry<O, Out>, run_after: Option<bool>) -> Self {
        Self {
            member: entry.member().to_string(),
            parameters: entry.parameters().iter().map(|p| p.name()).collect(),
            run_once: entry.options().run_once(),
            run_after,
            defined_at: entry.origin().to_string(),
        }
    }
}

impl StoreSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
