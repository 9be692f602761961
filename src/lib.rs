pub mod features;
pub mod shared;

use features::session::KeyValueStorage;
use features::store::HttpBillStore;
use log::info;
use shared::api_client::ApiClient;
use shared::config::initialize_application;

pub use features::bills::BillsController;
pub use features::navigation::{Navigator, Route, ROUTES_PATH};
pub use features::new_bill::NewBillController;
pub use features::session::{MemoryStorage, SessionUser, UserType};
pub use features::store::BillStore;
pub use shared::errors::{AppError, AppResult};

/// アプリケーションを初期化し、APIサーバーに接続するストアを作成する
///
/// 環境変数の読み込みとログ初期化を行った上で、
/// ストレージの認証トークンを付与したストアを返す。
pub fn connect(storage: &dyn KeyValueStorage) -> AppResult<HttpBillStore> {
    let init_result = initialize_application()?;
    let api_client = ApiClient::new_with_config(init_result.api_config)?;

    let store = HttpBillStore::from_storage(api_client, storage);
    info!(
        "レコードストアに接続しました: authenticated={}",
        store.has_auth_token()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_with_default_config() {
        let storage = MemoryStorage::new();
        storage.set_item(features::session::JWT_KEY, "token");

        let store = connect(&storage).unwrap();
        assert!(store.has_auth_token());
    }
}
