//! Priority-gated user-agent registry
//!
//! Several independent initializers may want to tag outbound calls with their
//! own product name. The registry keeps whichever registration carried the
//! highest priority; equal or lower priorities are ignored.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

static REGISTRY: Lazy<UserAgentRegistry> = Lazy::new(UserAgentRegistry::new);

/// Process-wide registry used to tag outbound requests.
pub fn user_agent_registry() -> &'static UserAgentRegistry {
    &REGISTRY
}

#[derive(Debug, Clone, Default)]
struct Registration {
    user_agent: String,
    project_version: String,
    priority: Option<i32>,
}

/// Holder for the preferred client identifier.
#[derive(Debug, Default)]
pub struct UserAgentRegistry {
    inner: Mutex<Registration>,
}

impl UserAgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user_agent` if `priority` is strictly higher than the current
    /// registration. Returns whether the registration took effect.
    pub fn register(&self, user_agent: &str, priority: i32, project_version: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.priority.is_some_and(|current| priority <= current) {
            return false;
        }
        *inner = Registration {
            user_agent: user_agent.to_string(),
            project_version: project_version.to_string(),
            priority: Some(priority),
        };
        true
    }

    pub fn user_agent(&self) -> String {
        self.inner.lock().user_agent.clone()
    }

    pub fn project_version(&self) -> String {
        self.inner.lock().project_version.clone()
    }

    /// `agent/version` form for an HTTP `User-Agent` header; `None` until
    /// something registers.
    pub fn header_value(&self) -> Option<String> {
        let inner = self.inner.lock();
        inner.priority?;
        if inner.project_version.is_empty() {
            Some(inner.user_agent.clone())
        } else {
            Some(format!("{}/{}", inner.user_agent, inner.project_version))
        }
    }
}
