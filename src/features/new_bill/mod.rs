/// 請求書作成機能モジュール
///
/// 添付ファイルの検証とアップロード、フォーム入力の下書きへの反映、
/// 請求書レコードの送信を担当します。
pub mod controller;
pub mod models;
pub mod validation;
pub mod views;

pub use controller::NewBillController;
pub use models::{Draft, NewBillForm, NewBillState, SelectedFile};
pub use validation::{
    is_allowed_attachment, validate_attachment, ALLOWED_EXTENSIONS, INVALID_FILE_EXTENSION,
};
pub use views::render_new_bill_page;
