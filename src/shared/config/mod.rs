/// 環境設定モジュール
pub mod environment;

/// アプリケーション初期化モジュール
pub mod initialization;

pub use environment::{
    get_environment, initialize_logging_system, load_environment_variables, ApiConfig,
    Environment, EnvironmentConfig,
};
pub use initialization::{initialize_application, log_initialization_complete, InitializationResult};
