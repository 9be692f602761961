use crate::shared::errors::{AppError, AppResult};

/// 添付可能な画像の拡張子
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 不正な拡張子のときに報告するメッセージ
pub const INVALID_FILE_EXTENSION: &str = "Invalid file extension";

/// 添付ファイル名の拡張子が許可されているかを判定する
///
/// 最後の `.` 以降を大文字小文字を区別して比較する。
/// 拡張子の無いファイル名は許可しない。
pub fn is_allowed_attachment(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| ALLOWED_EXTENSIONS.contains(&extension))
        .unwrap_or(false)
}

/// 添付ファイル名を検証する
pub fn validate_attachment(filename: &str) -> AppResult<()> {
    if is_allowed_attachment(filename) {
        Ok(())
    } else {
        Err(AppError::validation(INVALID_FILE_EXTENSION))
    }
}
