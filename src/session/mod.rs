// Session policy
//
// Who is talking and what they may do. Checks are synchronous and cheap;
// the dialogue layer consults them before any work starts.

pub trait SessionPolicy: Send + Sync {
    /// Whether the current session is anonymous (nobody logged in).
    fn is_anonymous(&self) -> bool;

    /// May this session configure `target`? None asks about configuring
    /// some not-yet-chosen device.
    fn can_configure_device(&self, target: Option<&str>) -> bool;
}

/// Single-user policy for a machine-local deployment. Both flags come
/// straight from configuration.
pub struct LocalSession {
    anonymous: bool,
    allow_configure: bool,
}

impl LocalSession {
    pub fn new(anonymous: bool, allow_configure: bool) -> Self {
        Self {
            anonymous,
            allow_configure,
        }
    }
}

impl SessionPolicy for LocalSession {
    fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    fn can_configure_device(&self, _target: Option<&str>) -> bool {
        self.allow_configure
    }
}
