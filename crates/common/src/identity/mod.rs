//! Process-wide client identity.

pub mod user_agent;

pub use user_agent::{user_agent_registry, UserAgentRegistry};
