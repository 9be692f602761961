/// 論理ルートのパス定義
#[derive(Debug, Clone, Copy)]
pub struct RoutesPath {
    pub login: &'static str,
    pub bills: &'static str,
    pub new_bill: &'static str,
    pub dashboard: &'static str,
}

pub const ROUTES_PATH: RoutesPath = RoutesPath {
    login: "/",
    bills: "#employee/bills",
    new_bill: "#employee/bill/new",
    dashboard: "#admin/dashboard",
};

/// アプリケーションのルート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    /// ルートの論理パスを取得
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => ROUTES_PATH.login,
            Route::Bills => ROUTES_PATH.bills,
            Route::NewBill => ROUTES_PATH.new_bill,
            Route::Dashboard => ROUTES_PATH.dashboard,
        }
    }

    /// 論理パスからルートを取得（未知のパスはNone）
    pub fn from_path(path: &str) -> Option<Self> {
        [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard]
            .into_iter()
            .find(|route| route.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/");
        assert_eq!(Route::Bills.path(), "#employee/bills");
        assert_eq!(Route::NewBill.path(), "#employee/bill/new");
        assert_eq!(Route::Dashboard.path(), "#admin/dashboard");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("#employee/bills"), Some(Route::Bills));
        assert_eq!(Route::from_path("#employee/bill/new"), Some(Route::NewBill));
        assert_eq!(Route::from_path("#unknown"), None);
    }
}
