// claimtier/src/commands/mod.rs

pub mod inspect;
pub mod rules;
pub mod run;
