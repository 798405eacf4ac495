use serde::Serialize;

/// Branch-like references of one repository, classified for display.
///
/// The classification is purely by name prefix: `remotes/...` entries are
/// remote-tracking branches, `tags/...` entries are tags and everything else
/// is local. Each category is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchSet {
    pub local: Vec<String>,
    pub remote: Vec<String>,
    pub tags: Vec<String>,
}

impl BranchSet {
    /// Partition raw reference names into local / remote / tag categories
    pub fn partition<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();

        for name in refs {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if let Some(remote) = name.strip_prefix("remotes/") {
                set.remote.push(remote.to_string());
            } else if let Some(tag) = name.strip_prefix("tags/") {
                set.tags.push(tag.to_string());
            } else {
                set.local.push(name.to_string());
            }
        }

        set.local.sort();
        set.remote.sort();
        set.tags.sort();
        set
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty() && self.tags.is_empty()
    }
}
