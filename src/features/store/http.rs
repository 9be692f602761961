//! APIサーバー経由のレコードストア

use super::client::{AttachmentUpload, BillStore, UploadedFile};
use crate::features::bills::models::{Bill, RawBill};
use crate::features::session::{read_auth_token, KeyValueStorage};
use crate::shared::api_client::ApiClient;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use log::info;
use reqwest::multipart;

/// 請求書リソースのエンドポイント
pub const BILLS_ENDPOINT: &str = "/bills";

/// APIサーバー経由で請求書を操作するストア
pub struct HttpBillStore {
    api_client: ApiClient,
    auth_token: Option<String>,
}

impl HttpBillStore {
    pub fn new(api_client: ApiClient, auth_token: Option<String>) -> Self {
        Self {
            api_client,
            auth_token,
        }
    }

    /// ストレージに保存された認証トークンを使用してストアを作成する
    pub fn from_storage(api_client: ApiClient, storage: &dyn KeyValueStorage) -> Self {
        Self::new(api_client, read_auth_token(storage))
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    fn bill_endpoint(id: &str) -> String {
        format!("{BILLS_ENDPOINT}/{id}")
    }
}

/// アップロード用のマルチパートフォームを構築する
fn build_upload_form(upload: &AttachmentUpload) -> AppResult<multipart::Form> {
    let part = multipart::Part::bytes(upload.data.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)
        .map_err(|e| AppError::validation(format!("MIMEタイプ設定エラー: {e}")))?;

    Ok(multipart::Form::new()
        .part("file", part)
        .text("email", upload.email.clone()))
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn list(&self) -> AppResult<Vec<RawBill>> {
        let bills: Vec<RawBill> = self
            .api_client
            .get(BILLS_ENDPOINT, self.auth_token.as_deref())
            .await?;

        info!("請求書一覧取得成功: count={}", bills.len());
        Ok(bills)
    }

    async fn upload_attachment(&self, upload: AttachmentUpload) -> AppResult<UploadedFile> {
        info!(
            "添付ファイルアップロード開始: file_name={}, size={} bytes",
            upload.file_name,
            upload.data.len()
        );

        let uploaded: UploadedFile = self
            .api_client
            .post_multipart(
                BILLS_ENDPOINT,
                || build_upload_form(&upload),
                self.auth_token.as_deref(),
            )
            .await?;

        info!("添付ファイルアップロード成功: key={}", uploaded.key);
        Ok(uploaded)
    }

    async fn create(&self, bill: &Bill) -> AppResult<()> {
        self.api_client
            .post_no_content(BILLS_ENDPOINT, bill, self.auth_token.as_deref())
            .await?;

        info!("請求書作成成功: date={}, status={}", bill.date, bill.status.as_str());
        Ok(())
    }

    async fn update(&self, id: &str, bill: &Bill) -> AppResult<RawBill> {
        let updated: RawBill = self
            .api_client
            .patch(&Self::bill_endpoint(id), bill, self.auth_token.as_deref())
            .await?;

        info!("請求書更新成功: id={id}");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::session::{MemoryStorage, JWT_KEY};
    use crate::shared::config::ApiConfig;

    fn api_client() -> ApiClient {
        ApiClient::new_with_config(ApiConfig::default()).unwrap()
    }

    #[test]
    fn test_from_storage_reads_token() {
        let storage = MemoryStorage::new();
        assert!(!HttpBillStore::from_storage(api_client(), &storage).has_auth_token());

        storage.set_item(JWT_KEY, "token");
        assert!(HttpBillStore::from_storage(api_client(), &storage).has_auth_token());
    }

    #[test]
    fn test_bill_endpoint() {
        assert_eq!(
            HttpBillStore::bill_endpoint("47qAXb6fIm2zOKkLzMro"),
            "/bills/47qAXb6fIm2zOKkLzMro"
        );
    }

    #[test]
    fn test_build_upload_form() {
        let upload = AttachmentUpload {
            email: "a@a".to_string(),
            file_name: "test.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: b"test".to_vec(),
        };
        assert!(build_upload_form(&upload).is_ok());

        let invalid = AttachmentUpload {
            content_type: "not a mime\n".to_string(),
            ..upload
        };
        assert!(build_upload_form(&invalid).is_err());
    }

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// 1回だけ応答するHTTPサーバーを起動し、受け取ったリクエストを返す
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (base_url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_is_complete(&buf) {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_is_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..header_end].to_lowercase();
        let body_len = buf.len() - (header_end + 4);

        if let Some(line) = headers.lines().find(|l| l.starts_with("content-length:")) {
            let expected: usize = line["content-length:".len()..].trim().parse().unwrap_or(0);
            return body_len >= expected;
        }
        if headers.contains("transfer-encoding: chunked") {
            return text.ends_with("0\r\n\r\n");
        }
        true
    }

    fn store_for(base_url: String) -> HttpBillStore {
        let config = ApiConfig {
            base_url,
            timeout_seconds: 5,
            max_retries: 0,
        };
        HttpBillStore::new(
            ApiClient::new_with_config(config).unwrap(),
            Some("token".to_string()),
        )
    }

    fn sample_bill() -> Bill {
        Bill::try_from(RawBill {
            email: Some("a@a".to_string()),
            expense_type: Some("Transports".to_string()),
            name: Some("Vol Paris-Brest".to_string()),
            date: Some("2024-02-10".to_string()),
            amount: Some(348.0),
            ..RawBill::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_token_and_decodes_rows() {
        let body = r#"[
            {"id":"47qAXb6fIm2zOKkLzMro","email":"a@a","date":"2004-04-04","amount":400,"status":"pending"},
            {"id":42,"email":"a@a","date":"2001-01-01","amount":"100","status":"refused"}
        ]"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let bills = store_for(base_url).list().await.unwrap();
        let request = server.await.unwrap().to_lowercase();

        assert!(request.starts_with("get /bills "));
        assert!(request.contains("authorization: bearer token"));
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[1].id.as_deref(), Some("42"));
        assert_eq!(bills[1].amount, Some(100.0));
    }

    #[tokio::test]
    async fn test_create_posts_bill() {
        let (base_url, server) = serve_once("201 Created", "").await;

        store_for(base_url).create(&sample_bill()).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /bills "));
        assert!(request.contains(r#""status":"pending""#));
        assert!(request.contains(r#""type":"Transports""#));
        assert!(!request.contains("fileUrl"));
    }

    #[tokio::test]
    async fn test_create_rejection_keeps_store_message() {
        let body = r#"{"error":{"code":"INTERNAL","message":"Erreur 500"}}"#;
        let (base_url, server) = serve_once("500 Internal Server Error", body).await;

        let error = store_for(base_url).create(&sample_bill()).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(error, AppError::Store(ref m) if m == "Erreur 500"));
    }

    #[tokio::test]
    async fn test_upload_attachment_sends_multipart() {
        let body = r#"{"fileUrl":"https://localhost:3456/images/test.jpg","key":"1234"}"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let upload = AttachmentUpload {
            email: "a@a".to_string(),
            file_name: "test.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: b"jpeg-bytes".to_vec(),
        };

        let uploaded = store_for(base_url).upload_attachment(upload).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(uploaded.key, "1234");
        assert_eq!(uploaded.file_url, "https://localhost:3456/images/test.jpg");
        assert!(request.starts_with("POST /bills "));
        assert!(request.contains(r#"name="file"; filename="test.jpg""#));
        assert!(request.contains(r#"name="email""#));
        assert!(request.contains("jpeg-bytes"));
    }

    #[tokio::test]
    async fn test_update_patches_bill_by_id() {
        let body = r#"{"id":"47qAXb6fIm2zOKkLzMro","email":"a@a","date":"2024-02-10","amount":348,"status":"accepted"}"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let updated = store_for(base_url)
            .update("47qAXb6fIm2zOKkLzMro", &sample_bill())
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("PATCH /bills/47qAXb6fIm2zOKkLzMro "));
        assert_eq!(updated.status.as_deref(), Some("accepted"));
    }

    #[tokio::test]
    async fn test_list_against_unreachable_server() {
        // 接続できないサーバーは外部サービスエラーになる
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 1,
            max_retries: 0,
        };
        let store = HttpBillStore::new(ApiClient::new_with_config(config).unwrap(), None);
        let result = store.list().await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }
}
