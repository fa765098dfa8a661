// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "dispatch/mod.rs"]
pub mod dispatch;

#[path = "errors/mod.rs"]
pub mod errors;

#[path = "games/mod.rs"]
pub mod games;

#[path = "guild_config/mod.rs"]
pub mod guild_config;
