//! 汎用APIクライアント
//!
//! レコードストア（APIサーバー）との通信を行う。
//! 請求書一覧・作成・更新と添付ファイルのアップロードで使用される。

use crate::shared::config::environment::ApiConfig;
use crate::shared::errors::{AppError, AppResult};
use log::{debug, info, warn};
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// APIサーバーからのエラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// 単純な `{ "message": ... }` 形式のエラーレスポンス
#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

/// 汎用APIクライアント
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// 設定を指定してAPIクライアントを作成
    pub fn new_with_config(config: ApiConfig) -> AppResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("HTTPクライアント初期化失敗: {e}")))?;

        Ok(Self { client, config })
    }

    /// 使用中の設定を取得
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// エンドポイントから完全なURLを構築
    pub fn url(&self, endpoint: &str) -> String {
        build_url(&self.config.base_url, endpoint)
    }

    /// GETリクエストを送信
    pub async fn get<T>(&self, endpoint: &str, auth_token: Option<&str>) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        info!("GETリクエスト送信: endpoint={endpoint}");

        let request = with_auth(self.client.get(self.url(endpoint)), auth_token);
        self.send_request_with_retry(request, "GET", endpoint).await
    }

    /// POSTリクエストを送信（成功ステータスのみ確認し、ボディは読まない）
    pub async fn post_no_content<B>(
        &self,
        endpoint: &str,
        body: &B,
        auth_token: Option<&str>,
    ) -> AppResult<()>
    where
        B: Serialize,
    {
        info!("POSTリクエスト送信: endpoint={endpoint}");

        let request = with_auth(self.client.post(self.url(endpoint)).json(body), auth_token);
        let mut attempts = 0;
        loop {
            let cloned_request = request.try_clone().ok_or_else(|| {
                AppError::external_service("APIサーバー", "リクエストのクローンに失敗しました")
            })?;

            match cloned_request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        info!("POSTリクエスト成功: endpoint={endpoint}");
                        return Ok(());
                    }
                    let body = response.text().await.unwrap_or_default();
                    warn!("POSTリクエスト失敗: endpoint={endpoint}, status={status}");
                    return Err(parse_error_body(status, &body));
                }
                Err(e) => {
                    if attempts < self.config.max_retries {
                        attempts += 1;
                        self.wait_before_retry(attempts).await;
                        continue;
                    }
                    return Err(AppError::external_service(
                        "APIサーバー".to_string(),
                        format!("接続に失敗しました: {e}"),
                    ));
                }
            }
        }
    }

    /// PATCHリクエストを送信
    pub async fn patch<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        info!("PATCHリクエスト送信: endpoint={endpoint}");

        let request = with_auth(self.client.patch(self.url(endpoint)).json(body), auth_token);
        self.send_request_with_retry(request, "PATCH", endpoint).await
    }

    /// マルチパートPOSTリクエストを送信
    ///
    /// フォームはクローンできないため、リトライごとに `build_form` で再作成する。
    pub async fn post_multipart<F, T>(
        &self,
        endpoint: &str,
        build_form: F,
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        F: Fn() -> AppResult<multipart::Form>,
        T: DeserializeOwned,
    {
        info!("マルチパートPOSTリクエスト送信: endpoint={endpoint}");

        let url = self.url(endpoint);
        let mut attempts = 0;
        loop {
            let request = with_auth(self.client.post(&url).multipart(build_form()?), auth_token);

            match request.send().await {
                Ok(response) => return self.read_response(response, "POST", endpoint).await,
                Err(e) => {
                    if attempts < self.config.max_retries {
                        attempts += 1;
                        self.wait_before_retry(attempts).await;
                        continue;
                    }
                    return Err(AppError::external_service(
                        "APIサーバー".to_string(),
                        format!("接続に失敗しました: {e}"),
                    ));
                }
            }
        }
    }

    /// リトライ機能付きでリクエストを送信
    async fn send_request_with_retry<T>(
        &self,
        request: RequestBuilder,
        method: &str,
        endpoint: &str,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let mut attempts = 0;
        loop {
            let cloned_request = request.try_clone().ok_or_else(|| {
                AppError::external_service("APIサーバー", "リクエストのクローンに失敗しました")
            })?;

            match cloned_request.send().await {
                Ok(response) => return self.read_response(response, method, endpoint).await,
                Err(e) => {
                    if attempts < self.config.max_retries {
                        attempts += 1;
                        self.wait_before_retry(attempts).await;
                        continue;
                    }
                    return Err(AppError::external_service(
                        "APIサーバー".to_string(),
                        format!("接続に失敗しました: {e}"),
                    ));
                }
            }
        }
    }

    async fn wait_before_retry(&self, attempts: u32) {
        let delay = retry_delay(attempts);
        warn!(
            "APIリクエスト失敗、リトライします: attempt={attempts}/{}, delay={delay:?}",
            self.config.max_retries
        );
        tokio::time::sleep(delay).await;
    }

    /// レスポンスを解析する（失敗ステータスはストアの拒否として扱う）
    async fn read_response<T>(
        &self,
        response: Response,
        method: &str,
        endpoint: &str,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let result: T = response.json().await.map_err(|e| {
                AppError::external_service(
                    "APIサーバー".to_string(),
                    format!("レスポンス解析エラー: {e}"),
                )
            })?;
            info!("{method}リクエスト成功: endpoint={endpoint}");
            return Ok(result);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{method}リクエスト失敗: endpoint={endpoint}, status={status}");
        Err(parse_error_body(status, &body))
    }
}

/// リトライ間隔の上限（秒）
const MAX_RETRY_DELAY_SECS: u64 = 60;

/// リトライ回数に応じた待機時間（指数バックオフ、上限あり）
fn retry_delay(attempts: u32) -> Duration {
    Duration::from_secs(2_u64.saturating_pow(attempts).min(MAX_RETRY_DELAY_SECS))
}

fn with_auth(request: RequestBuilder, auth_token: Option<&str>) -> RequestBuilder {
    match auth_token {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

/// ベースURLとエンドポイントを連結する
pub fn build_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// エラーレスポンスのボディからストア拒否エラーを作成する
///
/// 構造化されたメッセージがあればそれを、なければ `Erreur {status}` を使用する。
pub fn parse_error_body(status: StatusCode, body: &str) -> AppError {
    if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
        debug!(
            "構造化エラーレスポンスを受信: code={:?}, message={}",
            error_response.error.code, error_response.error.message
        );
        return AppError::store(error_response.error.message);
    }

    if let Ok(message_response) = serde_json::from_str::<MessageResponse>(body) {
        return AppError::store(message_response.message);
    }

    AppError::store(format!("Erreur {}", status.as_u16()))
}

/// ファイル名からContent-Typeを取得
pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}
