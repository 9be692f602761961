use super::models::{Draft, NewBillForm, NewBillState, SelectedFile};
use super::validation::{validate_attachment, INVALID_FILE_EXTENSION};
use super::views::render_new_bill_page;
use crate::features::bills::models::{Attachment, Bill};
use crate::features::navigation::{Navigator, Route};
use crate::features::session::{read_session_user, KeyValueStorage, SessionUser};
use crate::features::store::{AttachmentUpload, BillStore, UploadedFile};
use crate::shared::errors::{AppError, AppResult};
use log::{debug, error, info};

/// 請求書作成画面のコントローラー
///
/// ハンドラーは `&mut self` を取るため、同じフォームに対する
/// アップロードと送信が同時に実行されることはない。
pub struct NewBillController<S: BillStore, N: Navigator> {
    store: S,
    navigator: N,
    user: SessionUser,
    state: NewBillState,
    draft: Draft,
    file_input: Option<String>,
}

impl<S: BillStore, N: Navigator> NewBillController<S, N> {
    /// コントローラーを作成する（セッションユーザーはここで一度だけ読み込む）
    pub fn new(store: S, navigator: N, storage: &dyn KeyValueStorage) -> AppResult<Self> {
        let user = read_session_user(storage)?;
        debug!("作成画面を初期化: email={:?}", user.email);

        Ok(Self {
            store,
            navigator,
            user,
            state: NewBillState::Empty,
            draft: Draft::default(),
            file_input: None,
        })
    }

    pub fn state(&self) -> NewBillState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// ファイル入力欄に表示中のファイル名
    pub fn file_input(&self) -> Option<&str> {
        self.file_input.as_deref()
    }

    /// 添付ファイルの選択を処理する
    ///
    /// # 引数
    /// * `file` - 選択されたファイル
    ///
    /// # 戻り値
    /// アップロード結果。拡張子が不正な場合はアップロードせずにエラーを返す
    pub async fn handle_change_file(&mut self, file: SelectedFile) -> AppResult<UploadedFile> {
        self.ensure_not_submitted()?;

        if let Err(e) = validate_attachment(&file.name) {
            error!("{INVALID_FILE_EXTENSION}");
            self.file_input = None;
            return Err(e);
        }
        self.file_input = Some(file.name.clone());

        let email = self
            .user
            .email
            .clone()
            .ok_or_else(|| AppError::session("セッションにメールアドレスがありません"))?;

        let file_name = file.name;
        let upload = AttachmentUpload {
            email,
            file_name: file_name.clone(),
            content_type: file.content_type,
            data: file.data,
        };

        let uploaded = self.store.upload_attachment(upload).await.map_err(|e| {
            error!(
                "添付ファイルアップロード失敗: severity={:?}, {}",
                e.severity(),
                e.details()
            );
            e
        })?;

        // ストアが返すファイル名より利用者が選んだ元のファイル名を優先する
        let attachment = Attachment::from_parts(Some(uploaded.file_url.clone()), Some(file_name))?
            .ok_or_else(|| AppError::store("アップロード結果にURLがありません"))?;
        self.draft.attach(attachment, Some(uploaded.key.clone()));
        self.refresh_state();

        info!("添付ファイルを受理: key={}", uploaded.key);
        Ok(uploaded)
    }

    /// フォームの入力値を下書きに反映する
    pub fn fill_form(&mut self, form: &NewBillForm) -> AppResult<()> {
        self.ensure_not_submitted()?;

        self.draft.apply_form(form)?;
        self.refresh_state();
        Ok(())
    }

    fn ensure_not_submitted(&self) -> AppResult<()> {
        if self.state == NewBillState::Submitted {
            return Err(AppError::validation("この請求書は送信済みです"));
        }
        Ok(())
    }

    /// 下書きの内容から状態を決め直す（送信済みの場合は呼ばない）
    fn refresh_state(&mut self) {
        self.state = if self.draft.has_required_fields() {
            NewBillState::Ready
        } else if self.draft.attachment.is_some() {
            NewBillState::FileValidated
        } else {
            NewBillState::Empty
        };
    }

    /// フォームの送信を処理する
    ///
    /// 作成に失敗した場合はエラーをそのまま呼び出し元へ返し、遷移しない。
    /// 下書きは保持されるため再送信できる。
    pub async fn handle_submit(&mut self, form: &NewBillForm) -> AppResult<Bill> {
        self.fill_form(form)?;

        let bill = self.draft.build_bill(self.user.email.as_deref())?;
        self.store.create(&bill).await?;

        info!(
            "請求書を送信: date={}, attachment_key={:?}",
            bill.date,
            self.draft.key.as_deref()
        );
        self.navigator.navigate_to(Route::Bills);
        self.state = NewBillState::Submitted;
        self.draft = Draft::default();
        self.file_input = None;
        Ok(bill)
    }

    /// 画面から離れる際に下書きを破棄する
    pub fn discard_draft(&mut self) {
        self.draft = Draft::default();
        self.file_input = None;
        self.state = NewBillState::Empty;
    }

    pub fn render(&self) -> String {
        render_new_bill_page(self.file_input())
    }
}
