// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "config/mod.rs"]
pub mod config;

#[path = "guild_config/mod.rs"]
pub mod guild_config;

#[path = "paste/mod.rs"]
pub mod paste;

#[path = "tags/mod.rs"]
pub mod tags;

#[path = "telemetry/mod.rs"]
pub mod telemetry;
