//! Access tiers and the reveal policy
//!
//! A [`RevealPolicy`] maps each [`AccessTier`] to the sensitivity classes it may
//! see in clear. Tiers are nested: everything `standard` may reveal, `elevated`
//! may reveal too, and `full` reveals at least as much as `elevated`.

use crate::anonymization::detector::patterns::PatternRegistry;
use crate::anonymization::models::Sensitivity;
use crate::domain::{LexguardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Caller access tier for deanonymization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    Standard,
    Elevated,
    Full,
}

impl AccessTier {
    /// All tiers, narrowest first
    pub const ALL: [AccessTier; 3] = [AccessTier::Standard, AccessTier::Elevated, AccessTier::Full];
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Elevated => write!(f, "elevated"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "elevated" => Ok(Self::Elevated),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "Unknown access tier '{other}'. Must be one of: standard, elevated, full"
            )),
        }
    }
}

/// Sensitivity classes each tier may reveal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub standard: BTreeSet<Sensitivity>,
    pub elevated: BTreeSet<Sensitivity>,
    pub full: BTreeSet<Sensitivity>,
}

impl Default for TierTable {
    fn default() -> Self {
        use Sensitivity::*;
        Self {
            standard: BTreeSet::from([Low]),
            elevated: BTreeSet::from([Low, Medium]),
            full: BTreeSet::from([Low, Medium, High]),
        }
    }
}

impl TierTable {
    /// Classes visible at one tier
    pub fn classes(&self, tier: AccessTier) -> &BTreeSet<Sensitivity> {
        match tier {
            AccessTier::Standard => &self.standard,
            AccessTier::Elevated => &self.elevated,
            AccessTier::Full => &self.full,
        }
    }

    /// Mutable access to one tier's classes
    pub fn classes_mut(&mut self, tier: AccessTier) -> &mut BTreeSet<Sensitivity> {
        match tier {
            AccessTier::Standard => &mut self.standard,
            AccessTier::Elevated => &mut self.elevated,
            AccessTier::Full => &mut self.full,
        }
    }
}

/// Tier → visible sensitivity classes, plus role ceilings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealPolicy {
    /// Sensitivity classes each tier may reveal
    #[serde(default)]
    pub tiers: TierTable,

    /// Highest tier each role may request; unlisted roles get `standard`
    #[serde(default = "default_roles")]
    pub roles: BTreeMap<String, AccessTier>,
}

fn default_roles() -> BTreeMap<String, AccessTier> {
    [
        ("judge", AccessTier::Full),
        ("admin", AccessTier::Full),
        ("prosecutor", AccessTier::Elevated),
        ("clerk", AccessTier::Elevated),
    ]
    .into_iter()
    .map(|(role, tier)| (role.to_string(), tier))
    .collect()
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            roles: default_roles(),
        }
    }
}

impl RevealPolicy {
    /// Check that tiers are nested and role names are usable
    pub fn validate(&self) -> Result<()> {
        let mut previous: Option<(AccessTier, &BTreeSet<Sensitivity>)> = None;
        for tier in AccessTier::ALL {
            let classes = self.tiers.classes(tier);
            if let Some((narrower, narrower_classes)) = previous {
                if !narrower_classes.is_subset(classes) {
                    return Err(LexguardError::Configuration(format!(
                        "policy tier '{tier}' must reveal everything '{narrower}' reveals"
                    )));
                }
            }
            previous = Some((tier, classes));
        }

        for role in self.roles.keys() {
            if role.trim().is_empty() {
                return Err(LexguardError::Configuration(
                    "policy role names cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Sensitivity classes visible at a tier
    pub fn visible_at(&self, tier: AccessTier) -> BTreeSet<Sensitivity> {
        self.tiers.classes(tier).clone()
    }

    /// Whether `entity_type` may be revealed at `tier`
    ///
    /// Types unknown to the registry are never revealed.
    pub fn permits(&self, tier: AccessTier, entity_type: &str, registry: &PatternRegistry) -> bool {
        let Some(sensitivity) = registry.sensitivity_of(entity_type) else {
            return false;
        };
        self.tiers.classes(tier).contains(&sensitivity)
    }

    /// Highest tier a role may request
    pub fn ceiling_for(&self, role: &str) -> AccessTier {
        let role = role.trim();
        self.roles
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(role))
            .map(|(_, tier)| *tier)
            .unwrap_or(AccessTier::Standard)
    }

    /// Ensure `role` may request `tier`
    pub fn authorize(&self, role: &str, tier: AccessTier) -> Result<()> {
        let ceiling = self.ceiling_for(role);
        if tier > ceiling {
            tracing::warn!(role, requested = %tier, ceiling = %ceiling, "Access tier denied");
            return Err(LexguardError::Authorization(format!(
                "role '{role}' may use at most tier '{ceiling}', '{tier}' requested"
            )));
        }
        Ok(())
    }
}
