/// ナビゲーション機能モジュール
///
/// 論理パスとビュー切り替え関数（`onNavigate`）の抽象化を提供します。
pub mod routes;

pub use routes::{Route, ROUTES_PATH};

/// 論理パスを受け取って表示中のビューを切り替える関数
///
/// 同期的に実行され、常に成功する。
pub trait Navigator: Send + Sync {
    fn on_navigate(&self, path: &str);

    /// ルートを指定して遷移する
    fn navigate_to(&self, route: Route) {
        self.on_navigate(route.path());
    }
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_navigate(&self, path: &str) {
        self(path)
    }
}
