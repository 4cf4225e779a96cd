// claimtier-core/src/domain/rules/mod.rs

pub mod checks;
pub mod rule;
pub mod rule_set;

pub use checks::Rule;
pub use rule::{RuleCategory, RuleId, RuleViolation};
pub use rule_set::RuleSet;
