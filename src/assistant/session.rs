use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// In-memory chat log, one ordered turn list per user. Cleared when the
/// assistant view is (re)opened, append-only for the rest of the session,
/// uncapped. Concurrent turns from the same user may interleave appends;
/// that is an accepted limitation.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Vec<ChatTurn>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self, user_id: Uuid) -> Vec<ChatTurn> {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn append(&self, user_id: Uuid, role: ChatRole, text: impl Into<String>) {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .entry(user_id)
            .or_default()
            .push(ChatTurn {
                role,
                text: text.into(),
            });
    }

    pub fn clear(&self, user_id: Uuid) {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_per_user() {
        let store = SessionStore::new();
        let user = Uuid::new_v4();
        store.append(user, ChatRole::User, "cate oua am");
        store.append(user, ChatRole::Assistant, "Ai 6 buc de ouă.");

        let history = store.history(user);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].text, "Ai 6 buc de ouă.");
    }

    #[test]
    fn clear_only_touches_the_given_user() {
        let store = SessionStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.append(alice, ChatRole::User, "salut");
        store.append(bob, ChatRole::User, "buna");

        store.clear(alice);
        assert!(store.history(alice).is_empty());
        assert_eq!(store.history(bob).len(), 1);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = ChatTurn {
            role: ChatRole::Assistant,
            text: "ok".into(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
