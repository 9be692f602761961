use super::formatter::{format_bill, sort_by_date_desc, BillRow};
use super::models::Bill;
use super::views::{render_bills_page, AttachmentModal, BillsPage};
use crate::features::navigation::{Navigator, Route};
use crate::features::session::{read_session_user, KeyValueStorage, SessionUser};
use crate::features::store::BillStore;
use crate::shared::errors::AppResult;
use log::{error, info, warn};

/// プレビューモーダルの既定の幅（px）
pub const DEFAULT_MODAL_WIDTH: u32 = 800;

/// 請求書一覧画面のコントローラー
pub struct BillsController<S: BillStore, N: Navigator> {
    store: S,
    navigator: N,
    user: SessionUser,
    page: BillsPage,
    modal: Option<AttachmentModal>,
    modal_width: u32,
}

impl<S: BillStore, N: Navigator> BillsController<S, N> {
    /// コントローラーを作成する（セッションユーザーはここで一度だけ読み込む）
    pub fn new(store: S, navigator: N, storage: &dyn KeyValueStorage) -> AppResult<Self> {
        let user = read_session_user(storage)?;

        Ok(Self {
            store,
            navigator,
            user,
            page: BillsPage::Loading,
            modal: None,
            modal_width: DEFAULT_MODAL_WIDTH,
        })
    }

    /// モーダルの幅を指定する
    pub fn with_modal_width(mut self, modal_width: u32) -> Self {
        self.modal_width = modal_width;
        self
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    /// ストアから請求書を取得し、整形して日付の降順に並べる
    ///
    /// 必須項目を欠いたレコードは警告を出して読み飛ばす。
    pub async fn get_bills(&self) -> AppResult<Vec<BillRow>> {
        let raw_bills = self.store.list().await?;

        let mut rows: Vec<BillRow> = raw_bills
            .into_iter()
            .filter_map(|raw| {
                let id = raw.id.clone();
                match Bill::try_from(raw) {
                    Ok(bill) => Some(format_bill(bill)),
                    Err(e) => {
                        warn!("不正なレコードを読み飛ばします: id={id:?}, error={e}");
                        None
                    }
                }
            })
            .collect();

        sort_by_date_desc(&mut rows);
        Ok(rows)
    }

    /// 一覧を取得して画面の状態を更新する
    ///
    /// 取得に失敗してもエラーは返さず、メッセージをそのままエラー画面に表示する。
    pub async fn load_and_render(&mut self) -> &BillsPage {
        self.page = match self.get_bills().await {
            Ok(rows) => {
                info!("請求書一覧を表示: count={}", rows.len());
                BillsPage::Loaded(rows)
            }
            Err(e) => {
                error!("請求書一覧の取得に失敗: {}", e.details());
                BillsPage::Error(e.message())
            }
        };
        &self.page
    }

    pub fn page(&self) -> &BillsPage {
        &self.page
    }

    pub fn row_count(&self) -> usize {
        self.page.row_count()
    }

    pub fn modal(&self) -> Option<&AttachmentModal> {
        self.modal.as_ref()
    }

    /// 添付ファイルのプレビューを開く（通信は発生しない）
    pub fn handle_click_icon_eye(&mut self, file_url: Option<&str>) -> &AttachmentModal {
        self.modal.insert(AttachmentModal::new(file_url, self.modal_width))
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// 請求書作成画面へ遷移する
    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate_to(Route::NewBill);
    }

    pub fn render(&self) -> String {
        render_bills_page(&self.page, self.modal.as_ref())
    }
}
