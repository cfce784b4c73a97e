//! Growth simulation engine and session runtime for Cryptgrow.
//!
//! The simulation is split into pure rule functions that mutate a
//! [`GameState`] and an async runtime that drives them in real time.
//!
//! # Modules
//!
//! - [`catalog`] -- Static seed, soil, defense, nutrient mix and hazard
//!   tables.
//! - [`config`] -- Configuration loading from `cryptgrow-config.yaml` into
//!   strongly-typed structs, including the numeric [`GrowthRules`].
//! - [`state`] -- The [`GameState`] aggregate, event log and snapshots.
//! - [`resources`] -- Drain, feeding, lighting, stress and health rules.
//! - [`hazard`] -- Pest and raider rolls and their deferred resolution.
//! - [`harvest`] -- Potency and yield scoring.
//! - [`tick`] -- The ordered per-tick state transition.
//! - [`tasks`] -- Cancellable task set owned by a session.
//! - [`session`] -- [`GrowSession`]: tick scheduler, controls, callbacks
//!   and snapshot broadcast.
//!
//! [`GameState`]: state::GameState
//! [`GrowthRules`]: config::GrowthRules
//! [`GrowSession`]: session::GrowSession

pub mod catalog;
pub mod config;
mod dice;
pub mod harvest;
pub mod hazard;
pub mod resources;
pub mod session;
pub mod state;
pub mod tasks;
#[cfg(test)]
mod testing;
pub mod tick;
