/// セッション機能モジュール
///
/// ログイン済みユーザーの情報（種別・メールアドレス）を
/// キーバリューストレージから読み取る。コントローラーは書き込まない。
pub mod models;
pub mod storage;

pub use models::{SessionUser, UserType};
pub use storage::{
    read_auth_token, read_session_user, KeyValueStorage, MemoryStorage, JWT_KEY, USER_KEY,
};
