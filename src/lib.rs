//! LLM RPG - turn-based battles adjudicated by a language model
//!
//! The player types free-form actions; a judge model rates how feasible and
//! how damaging each one is, and the damage pipeline turns those ratings,
//! the fighters' stats, items, and typing signals into auditable damage.

pub mod battle;
pub mod combat;
pub mod core;
pub mod entity;
pub mod game;
pub mod llm;
