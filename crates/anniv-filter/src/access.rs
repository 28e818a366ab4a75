//! Who may run filter-driven mutations.
//!
//! Filtering itself is unrestricted and never consults these types. Callers
//! that act on a filtered set (marking people paid, recording shirt hand-outs)
//! check [`ManagePermission::can_manage`] first.

/// Capability check for managing attendee records.
pub trait ManagePermission {
    /// Returns true if `user` may modify attendee records.
    fn can_manage(&self, user: &str) -> bool;
}

impl<F> ManagePermission for F
where
    F: Fn(&str) -> bool,
{
    fn can_manage(&self, user: &str) -> bool {
        self(user)
    }
}

/// A fixed list of manager user names, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerList {
    managers: Vec<String>,
}

impl ManagerList {
    pub fn new<I, S>(managers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            managers: managers
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

impl ManagePermission for ManagerList {
    fn can_manage(&self, user: &str) -> bool {
        let user = user.trim().to_lowercase();
        !user.is_empty() && self.managers.iter().any(|name| *name == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_list_case_insensitive() {
        let managers = ManagerList::new(["Alice", " bob "]);
        assert!(managers.can_manage("alice"));
        assert!(managers.can_manage("BOB"));
        assert!(!managers.can_manage("carol"));
        assert!(!managers.can_manage(""));
    }

    #[test]
    fn test_empty_manager_list_denies_everyone() {
        let managers = ManagerList::new(Vec::<String>::new());
        assert!(managers.is_empty());
        assert!(!managers.can_manage("alice"));
    }

    #[test]
    fn test_closure_permission() {
        let only_admins = |user: &str| user.ends_with("@admin");
        assert!(only_admins.can_manage("root@admin"));
        assert!(!only_admins.can_manage("guest"));
    }
}
