use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use custom_user_exception::{Error, Result};
use uuid::Uuid;

use super::UserStore;
use crate::User;

/// InMemoryUserStore - process-local user storage
///
/// Keeps records in a `RwLock<HashMap>` and enforces the email and username
/// unique constraints under the write lock. Meant for tests and demos; a
/// poisoned lock is recovered rather than propagated.
///
/// # Examples
///
/// ```
/// use custom_user_users::{BaseUserManager, InMemoryUserStore, NewUser, UserManager, UserStore};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let store = Arc::new(InMemoryUserStore::new());
/// let manager = UserManager::new(store.clone());
///
/// manager
///     .create_user(NewUser::new("ada@example.com", "ada", "Ada", "Lovelace"), None)
///     .await
///     .unwrap();
///
/// assert_eq!(store.count().await.unwrap(), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
	users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
	/// Creates an empty store
	pub fn new() -> Self {
		Self::default()
	}

	fn conflict(users: &HashMap<Uuid, User>, user: &User) -> Option<&'static str> {
		let others = users.values().filter(|u| u.id != user.id);
		for other in others {
			if other.email == user.email {
				return Some("email");
			}
			if other.username == user.username {
				return Some("username");
			}
		}
		None
	}
}

#[async_trait]
impl UserStore for InMemoryUserStore {
	async fn insert(&self, user: User) -> Result<User> {
		let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());

		if users.contains_key(&user.id) {
			return Err(Error::UniqueViolation {
				field: "id".to_string(),
			});
		}
		if let Some(field) = Self::conflict(&users, &user) {
			return Err(Error::UniqueViolation {
				field: field.to_string(),
			});
		}

		users.insert(user.id, user.clone());
		Ok(user)
	}

	async fn update(&self, user: &User) -> Result<()> {
		let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());

		let date_joined = match users.get(&user.id) {
			Some(existing) => existing.date_joined,
			None => return Err(Error::NotFound(format!("user {}", user.id))),
		};
		if let Some(field) = Self::conflict(&users, user) {
			return Err(Error::UniqueViolation {
				field: field.to_string(),
			});
		}

		let mut stored = user.clone();
		stored.date_joined = date_joined;
		users.insert(stored.id, stored);
		Ok(())
	}

	async fn get(&self, id: Uuid) -> Result<Option<User>> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		Ok(users.get(&id).cloned())
	}

	async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		Ok(users.values().find(|u| u.email == email).cloned())
	}

	async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		Ok(users.values().find(|u| u.username == username).cloned())
	}

	async fn delete(&self, id: Uuid) -> Result<bool> {
		let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
		Ok(users.remove(&id).is_some())
	}

	async fn count(&self) -> Result<usize> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		Ok(users.len())
	}

	async fn list(&self) -> Result<Vec<User>> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		let mut all: Vec<User> = users.values().cloned().collect();
		all.sort_by_key(|u| u.date_joined);
		Ok(all)
	}
}
