/// レコードストア機能モジュール
///
/// 請求書レコードと添付ファイルを永続化するリモートストアの抽象化と、
/// APIサーバー経由の実装を提供します。
pub mod client;
pub mod http;

pub use client::{AttachmentUpload, BillStore, UploadedFile};
pub use http::{HttpBillStore, BILLS_ENDPOINT};
