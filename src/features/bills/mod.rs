/// 請求書一覧機能モジュール
///
/// 請求書レコードのモデル、一覧表示用の整形、HTMLテンプレート、
/// 一覧画面のコントローラーを提供します。
pub mod controller;
pub mod formatter;
pub mod models;
pub mod views;

pub use controller::{BillsController, DEFAULT_MODAL_WIDTH};
pub use formatter::{format_bill, format_date, format_status, sort_by_date_desc, BillRow};
pub use models::{Attachment, Bill, BillStatus, ExpenseType, RawBill, DEFAULT_PCT};
pub use views::{render_bills_page, AttachmentModal, BillsPage};
