use crate::shared::errors::{AppError, AppResult};

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境変数を取得する（優先順位: 起動時 > コンパイル時）
///
/// # 戻り値
/// 環境変数の値、または見つからない場合はNone
#[macro_export]
macro_rules! get_env_var_optional {
    ($var_name:expr) => {{
        if let Ok(value) = std::env::var($var_name) {
            log::debug!("環境変数 {} を起動時の環境変数から取得しました", $var_name);
            Some(value)
        } else if let Some(value) = option_env!($var_name) {
            log::debug!("環境変数 {} をコンパイル時の環境変数から取得しました", $var_name);
            Some(value.to_string())
        } else {
            None
        }
    }};
}

/// 環境変数を取得する（デフォルト値付き）
#[macro_export]
macro_rules! get_env_var_or_default {
    ($var_name:expr, $default_value:expr) => {{
        $crate::get_env_var_optional!($var_name).unwrap_or_else(|| {
            log::debug!(
                "環境変数 {} が見つからないため、デフォルト値を使用します: {}",
                $var_name,
                $default_value
            );
            $default_value.to_string()
        })
    }};
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// デバッグモードの有効/無効
    pub debug_mode: bool,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
        }
    }

    /// プロダクション環境かどうかを判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 開発環境かどうかを判定
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        let env = parse_environment(embedded_env);
        log::debug!("環境判定: コンパイル時埋め込み値を使用 -> {embedded_env} -> {env:?}");
        return env;
    }

    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = parse_environment(&env_var);
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

fn parse_environment(value: &str) -> Environment {
    match value {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}

/// 環境に応じた.envファイル名を取得する
pub fn get_env_filename(env: &Environment) -> &'static str {
    match env {
        Environment::Development => ".env",
        Environment::Production => ".env.production",
    }
}

/// 環境に応じた.envファイルを読み込む
///
/// 環境固有のファイルがない場合はデフォルトの.envを試行する。
/// どちらも無い場合は直接設定された環境変数のみを使用する。
pub fn load_environment_variables() {
    if let Some(env) = option_env!("EMBEDDED_ENVIRONMENT") {
        log::info!("コンパイル時埋め込み環境設定を使用: {env}");
        return;
    }

    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let env_file = get_env_filename(&parse_environment(&environment));

    log::info!("環境: {environment}, 読み込み対象: {env_file}");

    match dotenv::from_filename(env_file) {
        Ok(_) => {
            log::info!("{env_file}ファイルを読み込みました");
        }
        Err(_) if env_file != ".env" => match dotenv::dotenv() {
            Ok(_) => {
                log::warn!("{env_file}が見つからないため、デフォルトの.envファイルを読み込みました");
            }
            Err(_) => {
                log::warn!("環境変数ファイルが見つかりません。直接設定された環境変数を使用します。");
            }
        },
        Err(_) => {
            log::warn!(".envファイルが見つかりません。直接設定された環境変数を使用します。");
        }
    }
}

/// ログレベル文字列をフィルターに変換する
pub fn parse_log_level(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

/// ログシステムを初期化する
///
/// 二重初期化は無視する（テストから複数回呼ばれるため）。
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();
    let log_level = parse_log_level(&env_config.log_level);

    let result = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    match result {
        Ok(()) => {
            log::info!(
                "ログシステムを初期化しました: level={}, environment={}",
                env_config.log_level,
                env_config.environment
            );
            if env_config.is_development() && env_config.debug_mode {
                log::debug!("デバッグモードで実行中です");
            }
        }
        Err(e) => log::debug!("ログシステムは既に初期化されています: {e}"),
    }
}

/// APIサーバー（レコードストア）の設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// APIサーバーのベースURL
    pub base_url: String,
    /// APIリクエストのタイムアウト（秒）
    pub timeout_seconds: u64,
    /// APIリクエストの最大リトライ回数
    pub max_retries: u32,
}

pub const DEFAULT_API_SERVER_URL: &str = "http://localhost:5678";

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_SERVER_URL.to_string(),
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl ApiConfig {
    /// 環境変数からAPI設定を読み込む
    pub fn from_env() -> Self {
        log::debug!("ApiConfig::from_env() - 環境変数の読み込みを開始");

        let base_url = crate::get_env_var_or_default!("API_SERVER_URL", DEFAULT_API_SERVER_URL);

        let timeout_seconds = crate::get_env_var_or_default!("API_TIMEOUT_SECONDS", "30")
            .parse()
            .unwrap_or_else(|_| {
                log::warn!(
                    "API_TIMEOUT_SECONDSのパースに失敗しました。デフォルト値30秒を使用します"
                );
                30
            });

        let max_retries = crate::get_env_var_or_default!("API_MAX_RETRIES", "3")
            .parse()
            .unwrap_or_else(|_| {
                log::warn!("API_MAX_RETRIESのパースに失敗しました。デフォルト値3回を使用します");
                3
            });

        log::info!(
            "API設定: base_url={base_url}, timeout={timeout_seconds}s, max_retries={max_retries}"
        );

        Self {
            base_url,
            timeout_seconds,
            max_retries,
        }
    }

    /// 設定を検証する
    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.is_empty() {
            return Err(AppError::configuration(
                "APIサーバーのベースURLが設定されていません",
            ));
        }

        url::Url::parse(&self.base_url).map_err(|e| {
            AppError::configuration(format!("APIサーバーのベースURLが不正です: {e}"))
        })?;

        if self.timeout_seconds == 0 {
            return Err(AppError::configuration(
                "APIタイムアウトは0より大きい値である必要があります",
            ));
        }

        Ok(())
    }

    /// APIサーバーがlocalhostかどうかを判定
    pub fn is_localhost(&self) -> bool {
        self.base_url.contains("localhost") || self.base_url.contains("127.0.0.1")
    }
}
