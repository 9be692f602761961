use super::environment::{
    get_environment, initialize_logging_system, load_environment_variables, ApiConfig,
    Environment,
};
use crate::shared::errors::AppResult;

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug)]
pub struct InitializationResult {
    /// 実行環境
    pub environment: Environment,
    /// 検証済みのAPI設定
    pub api_config: ApiConfig,
}

/// アプリケーションの初期化を実行する
///
/// # 処理内容
/// 1. 環境に応じた.envファイルの読み込み
/// 2. ログシステムの初期化
/// 3. API設定の読み込みと検証
pub fn initialize_application() -> AppResult<InitializationResult> {
    load_environment_variables();
    initialize_logging_system();

    let environment = get_environment();
    let api_config = ApiConfig::from_env();
    api_config.validate()?;

    log_initialization_complete(&environment, &api_config);

    Ok(InitializationResult {
        environment,
        api_config,
    })
}

/// 初期化完了ログを出力する
pub fn log_initialization_complete(environment: &Environment, api_config: &ApiConfig) {
    log::info!("=== アプリケーション初期化完了 ===");
    log::info!("環境: {environment:?}");
    log::info!("APIサーバー: {}", api_config.base_url);
    if api_config.is_localhost() {
        if *environment == Environment::Production {
            log::warn!("本番環境でローカルのAPIサーバーが設定されています");
        } else {
            log::debug!("ローカルのAPIサーバーを使用します");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_application() {
        // API_SERVER_URL未設定でもデフォルト値で初期化できる
        let result = initialize_application().unwrap();
        assert!(!result.api_config.base_url.is_empty());
        assert!(matches!(
            result.environment,
            Environment::Development | Environment::Production
        ));
    }
}
