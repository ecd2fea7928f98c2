pub mod agent;
pub mod arena;
pub mod geometry;
pub mod host;
pub mod match_loop;
pub mod opponents;
pub mod policy;

pub use agent::CombatAgent;
pub use arena::Arena;
pub use host::{Host, HostError, ScriptedHost};
pub use match_loop::*;
pub use policy::*;
