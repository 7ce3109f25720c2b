use std::collections::HashMap;
use std::sync::Arc;

use gitpulse_types::{BranchName, ProjectId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-(project, branch) async locks.
///
/// Collection and aggregation for the same branch must not interleave:
/// both read and rewrite the same commit and aggregate rows. Different
/// branches proceed independently.
#[derive(Clone, Default)]
pub struct BranchLocks {
    inner: Arc<Mutex<HashMap<(ProjectId, BranchName), Arc<Mutex<()>>>>>,
}

impl BranchLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the branch. The guard releases the
    /// branch when dropped; the registry entry itself is kept so a
    /// concurrent caller always locks the same mutex.
    pub async fn acquire(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
    ) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry((project_id, branch.clone()))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
