use super::models::SessionUser;
use crate::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// セッションユーザーが保存されているキー
pub const USER_KEY: &str = "user";

/// 認証トークンが保存されているキー
pub const JWT_KEY: &str = "jwt";

/// 永続キーバリューストレージ（ブラウザのlocalStorage相当）
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// メモリ上のキーバリューストレージ
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// セッションユーザーを保存済みのストレージを作成する
    pub fn with_user(user: &SessionUser) -> AppResult<Self> {
        let storage = Self::new();
        storage.set_item(USER_KEY, &serde_json::to_string(user)?);
        Ok(storage)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.items.lock() {
            Ok(items) => items.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        match self.items.lock() {
            Ok(mut items) => {
                items.insert(key.to_string(), value.to_string());
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(key.to_string(), value.to_string());
            }
        }
    }

    fn remove_item(&self, key: &str) {
        match self.items.lock() {
            Ok(mut items) => {
                items.remove(key);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(key);
            }
        }
    }
}

/// ストレージからセッションユーザーを読み込む
///
/// # 戻り値
/// セッションユーザー、または `user` キーが無い・JSONが不正な場合はエラー
pub fn read_session_user(storage: &dyn KeyValueStorage) -> AppResult<SessionUser> {
    let raw = storage
        .get_item(USER_KEY)
        .ok_or_else(|| AppError::session("ローカルストレージにuserキーがありません"))?;

    serde_json::from_str(&raw)
        .map_err(|e| AppError::session(format!("userキーのJSONが不正です: {e}")))
}

/// ストレージから認証トークンを読み込む
pub fn read_auth_token(storage: &dyn KeyValueStorage) -> Option<String> {
    storage.get_item(JWT_KEY).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::session::models::UserType;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("user"), None);

        storage.set_item("user", "{}");
        assert_eq!(storage.get_item("user").as_deref(), Some("{}"));

        storage.remove_item("user");
        assert_eq!(storage.get_item("user"), None);
    }

    #[test]
    fn test_read_session_user() {
        let storage = MemoryStorage::new();
        storage.set_item(USER_KEY, r#"{"type":"Employee","email":"a@a"}"#);

        let user = read_session_user(&storage).unwrap();
        assert_eq!(user.user_type, Some(UserType::Employee));
        assert_eq!(user.email.as_deref(), Some("a@a"));
    }

    #[test]
    fn test_read_session_user_missing() {
        let storage = MemoryStorage::new();
        let result = read_session_user(&storage);
        assert!(matches!(result, Err(AppError::Session(_))));
    }

    #[test]
    fn test_read_session_user_malformed() {
        let storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "not json");
        assert!(matches!(
            read_session_user(&storage),
            Err(AppError::Session(_))
        ));
    }

    #[test]
    fn test_read_auth_token() {
        let storage = MemoryStorage::new();
        assert_eq!(read_auth_token(&storage), None);

        storage.set_item(JWT_KEY, "");
        assert_eq!(read_auth_token(&storage), None);

        storage.set_item(JWT_KEY, "token");
        assert_eq!(read_auth_token(&storage).as_deref(), Some("token"));
    }

    #[test]
    fn test_with_user() {
        let storage = MemoryStorage::with_user(&SessionUser::employee("a@a")).unwrap();
        let user = read_session_user(&storage).unwrap();
        assert_eq!(user, SessionUser::employee("a@a"));
    }
}
