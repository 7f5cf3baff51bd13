use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mount state of a volume.
///
/// `mounted_by` is a set: a mounter ID is either holding the volume or not.
/// An empty set means the volume is unmounted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStatus {
    // Older records were written with "mountBy".
    #[serde(rename = "mountedBy", alias = "mountBy", default)]
    pub mounted_by: BTreeSet<String>,
}

impl VolumeStatus {
    pub fn is_mounted(&self) -> bool {
        !self.mounted_by.is_empty()
    }

    pub fn is_mounted_by(&self, id: &str) -> bool {
        self.mounted_by.contains(id)
    }

    /// Record `id` as a mounter. Returns false if it was already present.
    pub fn add_mount(&mut self, id: &str) -> bool {
        self.mounted_by.insert(id.to_string())
    }

    /// Forget `id` as a mounter. Returns false if it was not present.
    pub fn remove_mount(&mut self, id: &str) -> bool {
        self.mounted_by.remove(id)
    }

    pub fn mounters(&self) -> Vec<String> {
        self.mounted_by.iter().cloned().collect()
    }
}
