//! コントローラーのテスト用のモック

use crate::features::bills::models::{Bill, RawBill};
use crate::features::navigation::Navigator;
use crate::features::store::{AttachmentUpload, BillStore, UploadedFile};
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

fn fixture_bill(id: &str, name: &str, date: &str, amount: f64, status: &str) -> RawBill {
    RawBill {
        id: Some(id.to_string()),
        email: Some("a@a".to_string()),
        expense_type: Some("Hôtel et logement".to_string()),
        name: Some(name.to_string()),
        date: Some(date.to_string()),
        amount: Some(amount),
        vat: Some("80".to_string()),
        pct: Some(20.0),
        commentary: Some("séminaire billed".to_string()),
        file_url: Some(format!("https://test.storage.tld/v0/b/billable/{id}.jpg")),
        file_name: Some("preview-facture-free-201801-pdf-1.jpg".to_string()),
        status: Some(status.to_string()),
    }
}

/// ストアに保存されている4件の請求書
pub fn fixture_bills() -> Vec<RawBill> {
    vec![
        fixture_bill("47qAXb6fIm2zOKkLzMro", "encore", "2004-04-04", 400.0, "pending"),
        fixture_bill("BeKy5Mo4jkmdfPGYpTxZ", "test1", "2001-01-01", 100.0, "refused"),
        fixture_bill("UIUZtnPQvnbFnB0ozvJh", "test3", "2003-03-03", 300.0, "accepted"),
        fixture_bill("qcCK3SzECmaZAGRrHjaC", "test2", "2002-02-02", 200.0, "refused"),
    ]
}

type ErrorFactory = Box<dyn Fn() -> AppError + Send>;

#[derive(Default)]
struct MockState {
    bills: Vec<RawBill>,
    list_error: Option<ErrorFactory>,
    upload_error: Option<String>,
    create_error: Option<String>,
    uploads: Vec<AttachmentUpload>,
    created: Vec<Bill>,
}

/// メモリ上のストア（呼び出しを記録し、失敗を注入できる）
#[derive(Clone)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::with_bills(fixture_bills())
    }

    pub fn with_bills(bills: Vec<RawBill>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                bills,
                ..MockState::default()
            })),
        }
    }

    pub fn fail_list(&self, message: &str) {
        let message = message.to_string();
        self.fail_list_with(move || AppError::store(message.clone()));
    }

    /// 一覧取得で任意のエラーを返すようにする
    pub fn fail_list_with<F>(&self, make_error: F)
    where
        F: Fn() -> AppError + Send + 'static,
    {
        self.state.lock().unwrap().list_error = Some(Box::new(make_error));
    }

    pub fn fail_upload(&self, message: &str) {
        self.state.lock().unwrap().upload_error = Some(message.to_string());
    }

    pub fn fail_create(&self, message: &str) {
        self.state.lock().unwrap().create_error = Some(message.to_string());
    }

    /// 注入した失敗をすべて解除する
    pub fn recover(&self) {
        let mut state = self.state.lock().unwrap();
        state.list_error = None;
        state.upload_error = None;
        state.create_error = None;
    }

    pub fn uploads(&self) -> Vec<AttachmentUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn created(&self) -> Vec<Bill> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait]
impl BillStore for MockStore {
    async fn list(&self) -> AppResult<Vec<RawBill>> {
        let state = self.state.lock().unwrap();
        match &state.list_error {
            Some(make_error) => Err(make_error()),
            None => Ok(state.bills.clone()),
        }
    }

    async fn upload_attachment(&self, upload: AttachmentUpload) -> AppResult<UploadedFile> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.upload_error {
            return Err(AppError::store(message.clone()));
        }
        state.uploads.push(upload);
        Ok(UploadedFile {
            file_url: "https://localhost:3456/images/test.jpg".to_string(),
            file_name: None,
            key: "1234".to_string(),
        })
    }

    async fn create(&self, bill: &Bill) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.create_error {
            return Err(AppError::store(message.clone()));
        }
        state.created.push(bill.clone());
        Ok(())
    }

    async fn update(&self, id: &str, bill: &Bill) -> AppResult<RawBill> {
        let state = self.state.lock().unwrap();
        if !state.bills.iter().any(|b| b.id.as_deref() == Some(id)) {
            return Err(AppError::not_found(id));
        }
        Ok(serde_json::from_value(serde_json::to_value(bill)?)?)
    }
}

/// 遷移先を記録するナビゲーター
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    visited: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn on_navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::bills::models::BillStatus;

    #[tokio::test]
    async fn test_update_existing_bill() {
        let store = MockStore::new();
        let mut bill = Bill::try_from(fixture_bills().remove(0)).unwrap();
        bill.status = BillStatus::Accepted;

        let updated = store.update("47qAXb6fIm2zOKkLzMro", &bill).await.unwrap();
        assert_eq!(updated.status.as_deref(), Some("accepted"));
        assert_eq!(updated.id.as_deref(), Some("47qAXb6fIm2zOKkLzMro"));

        assert!(matches!(
            store.update("unknown", &bill).await,
            Err(AppError::NotFound(_))
        ));
    }
}
