//! Lineup slots: how many players each position slot holds and which codes a flex slot accepts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::RosterEntry;

/// Standard head-to-head hockey lineup.
pub const DEFAULT_SLOTS: &[(&str, u32)] = &[
    ("C", 2),
    ("LW", 2),
    ("RW", 2),
    ("D", 4),
    ("G", 2),
    ("UTIL", 1),
];

/// Most seats a lineup may have. Each day allocates per-seat eligibility for every candidate.
pub const MAX_SEATS: u64 = 64;

/// Flex slots and the position codes they accept.
pub const DEFAULT_FLEX: &[(&str, &[&str])] = &[("UTIL", &["C", "LW", "RW", "D"])];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalLimits {
    slots: BTreeMap<String, u32>,
    #[serde(default)]
    flex: BTreeMap<String, Vec<String>>,
}

impl Default for PositionalLimits {
    fn default() -> Self {
        let slots = DEFAULT_SLOTS
            .iter()
            .map(|(slot, count)| (slot.to_string(), *count))
            .collect();
        let flex = DEFAULT_FLEX
            .iter()
            .map(|(slot, codes)| {
                (
                    slot.to_string(),
                    codes.iter().map(|code| code.to_string()).collect(),
                )
            })
            .collect();
        Self { slots, flex }
    }
}

impl PositionalLimits {
    pub fn new(slots: BTreeMap<String, u32>, flex: BTreeMap<String, Vec<String>>) -> Self {
        Self { slots, flex }
    }

    /// Dedicated slots only.
    pub fn without_flex(slots: BTreeMap<String, u32>) -> Self {
        Self {
            slots,
            flex: BTreeMap::new(),
        }
    }

    pub fn slots(&self) -> &BTreeMap<String, u32> {
        &self.slots
    }

    pub fn flex(&self) -> &BTreeMap<String, Vec<String>> {
        &self.flex
    }

    pub fn is_flex(&self, slot: &str) -> bool {
        self.flex.contains_key(slot)
    }

    pub fn total_seats(&self) -> u64 {
        self.slots.values().map(|count| u64::from(*count)).sum()
    }

    /// One entry per seat. Dedicated slots come before flex slots.
    pub fn seats(&self) -> Vec<&str> {
        let dedicated = self.slots.iter().filter(|(slot, _)| !self.is_flex(slot));
        let flex = self.slots.iter().filter(|(slot, _)| self.is_flex(slot));
        dedicated
            .chain(flex)
            .flat_map(|(slot, count)| std::iter::repeat(slot.as_str()).take(*count as usize))
            .collect()
    }

    /// Slots a scan should try hypothetical players in: every dedicated slot.
    pub fn tracked_positions(&self) -> Vec<String> {
        self.slots
            .keys()
            .filter(|slot| !self.is_flex(slot))
            .cloned()
            .collect()
    }

    pub fn accepts(&self, slot: &str, entry: &RosterEntry) -> bool {
        let codes = entry.position_codes();
        match self.flex.get(slot) {
            Some(accepted) => codes
                .iter()
                .any(|code| accepted.iter().any(|a| a == code)),
            None => codes.contains(&slot),
        }
    }

    /// Whether any slot would take a player listed at `code`.
    pub fn recognizes_code(&self, code: &str) -> bool {
        self.slots.keys().any(|slot| {
            if let Some(accepted) = self.flex.get(slot) {
                accepted.iter().any(|a| a == code)
            } else {
                slot == code
            }
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(slot) = self.flex.keys().find(|slot| !self.slots.contains_key(*slot)) {
            return Err(format!("flex slot '{slot}' has no limit"));
        }
        let total = self.total_seats();
        if total > MAX_SEATS {
            return Err(format!("{total} lineup seats exceeds the maximum of {MAX_SEATS}"));
        }
        Ok(())
    }
}
