use serde::{Deserialize, Serialize};

/// ユーザー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

/// ローカルストレージの `user` キーに保存されているセッションユーザー
///
/// 一覧画面では `email` が、作成画面では `type` が省略されることがある。
/// メールアドレスは請求書レコードを組み立てる時点で必須になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionUser {
    /// 従業員ユーザーを作成する
    pub fn employee<S: Into<String>>(email: S) -> Self {
        Self {
            user_type: Some(UserType::Employee),
            email: Some(email.into()),
        }
    }

    /// 従業員かどうかを判定
    pub fn is_employee(&self) -> bool {
        self.user_type == Some(UserType::Employee)
    }
}
