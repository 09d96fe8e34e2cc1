//! Process-role guard for stateful resources
//!
//! Connections and file handles must not be shared across a fork. Instead
//! of relying on callers to build resources only after forking, the
//! registry refuses to build any stateful resource until the process has
//! declared what it is:
//!
//! - [`ProcessRole::Supervisor`]: will fork workers; stateful resources are
//!   refused
//! - [`ProcessRole::Worker`]: a forked child; resources are built per process
//! - [`ProcessRole::Standalone`]: never forks
//!
//! The declaring pid is recorded, so a registry copied into a child by a
//! fork fails fast until the child declares its own role.

use std::fmt;

use parking_lot::Mutex;

use crate::resource::ResourceKind;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessRole {
    Standalone,
    Supervisor,
    Worker,
}

impl ProcessRole {
    pub fn allows_stateful(&self) -> bool {
        !matches!(self, Self::Supervisor)
    }
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standalone => "standalone",
            Self::Supervisor => "supervisor",
            Self::Worker => "worker",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoleMarker {
    role: ProcessRole,
    pid: u32,
}

/// Records the declared role and the pid that declared it.
#[derive(Debug, Default)]
pub(crate) struct RoleGuard {
    marker: Mutex<Option<RoleMarker>>,
}

impl RoleGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declare the role of the current process.
    ///
    /// `stateful_built` reports whether any stateful slot already holds a
    /// handle. Such handles belong to the declaring process, so a fork
    /// child cannot adopt them and the role cannot be changed under them.
    pub(crate) fn declare(&self, role: ProcessRole, stateful_built: bool) -> Result<()> {
        let current = std::process::id();
        let mut marker = self.marker.lock();

        if let Some(existing) = *marker {
            if stateful_built && existing.pid != current {
                return Err(Error::InheritedResources {
                    declared: existing.pid,
                    current,
                });
            }
            if stateful_built && existing.role != role {
                return Err(Error::RoleLocked {
                    from: existing.role,
                    to: role,
                });
            }
        }

        tracing::debug!(%role, pid = current, "declared process role");
        *marker = Some(RoleMarker { role, pid: current });
        Ok(())
    }

    pub(crate) fn role(&self) -> Option<ProcessRole> {
        self.marker.lock().map(|m| m.role)
    }

    /// Whether handles in this registry belong to the current process.
    ///
    /// False only when a role was declared by another pid, i.e. the
    /// registry was inherited across a fork.
    pub(crate) fn owned_by_current_process(&self) -> bool {
        self.marker
            .lock()
            .is_none_or(|m| m.pid == std::process::id())
    }

    #[cfg(test)]
    pub(crate) fn declare_from_pid(&self, role: ProcessRole, pid: u32) {
        *self.marker.lock() = Some(RoleMarker { role, pid });
    }

    /// Fail unless `resource` may be built or handed out in this process.
    pub(crate) fn check(&self, resource: ResourceKind) -> Result<()> {
        if !resource.is_stateful() {
            return Ok(());
        }

        let current = std::process::id();
        match *self.marker.lock() {
            None => Err(Error::RoleNotDeclared { resource }),
            Some(marker) if marker.pid != current => Err(Error::ForkedProcess {
                resource,
                declared: marker.pid,
                current,
            }),
            Some(marker) if !marker.role.allows_stateful() => {
                Err(Error::SupervisorProcess { resource })
            }
            Some(_) => Ok(()),
        }
    }
}
