use std::collections::HashMap;

use sysinfo::Users;

/// Resolves a numeric uid to a login name
pub trait UserLookup {
    fn username(&mut self, uid: u32) -> Option<String>;
}

/// System user database via `sysinfo`, with a uid -> name cache
pub struct SystemUsers {
    users: Users,
    /// Cache: uid -> resolved login name, `None` for uids with no account
    cache: HashMap<u32, Option<String>>,
}

impl SystemUsers {
    pub fn new() -> Self {
        Self {
            users: Users::new_with_refreshed_list(),
            cache: HashMap::new(),
        }
    }

    fn find(&self, uid: u32) -> Option<String> {
        self.users
            .iter()
            .find(|u| **u.id() == uid)
            .map(|u| u.name().to_string())
    }
}

impl Default for SystemUsers {
    fn default() -> Self {
        Self::new()
    }
}

impl UserLookup for SystemUsers {
    fn username(&mut self, uid: u32) -> Option<String> {
        if let Some(cached) = self.cache.get(&uid) {
            return cached.clone();
        }
        // Accounts may have been added since startup; reload once per unseen uid
        let name = self.find(uid).or_else(|| {
            self.users = Users::new_with_refreshed_list();
            self.find(uid)
        });
        self.cache.insert(uid, name.clone());
        name
    }
}
