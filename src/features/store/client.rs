use crate::features::bills::models::{Bill, RawBill};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 添付ファイルのアップロード要求
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUpload {
    /// アップロード先をスコープするセッションユーザーのメールアドレス
    pub email: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 添付ファイルのアップロード結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    /// ストアが割り当てた識別子
    pub key: String,
}

/// 請求書レコードストアのクライアント
#[async_trait]
pub trait BillStore: Send + Sync {
    /// セッションから見える請求書をすべて取得する
    async fn list(&self) -> AppResult<Vec<RawBill>>;

    /// 添付ファイルをアップロードする
    async fn upload_attachment(&self, upload: AttachmentUpload) -> AppResult<UploadedFile>;

    /// 請求書レコードを作成する（レスポンスの内容は使用しない）
    async fn create(&self, bill: &Bill) -> AppResult<()>;

    /// 請求書レコードを更新する
    async fn update(&self, id: &str, bill: &Bill) -> AppResult<RawBill>;
}

#[async_trait]
impl<S> BillStore for Arc<S>
where
    S: BillStore + ?Sized,
{
    async fn list(&self) -> AppResult<Vec<RawBill>> {
        (**self).list().await
    }

    async fn upload_attachment(&self, upload: AttachmentUpload) -> AppResult<UploadedFile> {
        (**self).upload_attachment(upload).await
    }

    async fn create(&self, bill: &Bill) -> AppResult<()> {
        (**self).create(bill).await
    }

    async fn update(&self, id: &str, bill: &Bill) -> AppResult<RawBill> {
        (**self).update(id, bill).await
    }
}
