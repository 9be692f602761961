use crate::features::bills::models::{Attachment, Bill, BillStatus, ExpenseType, DEFAULT_PCT};
use crate::shared::api_client::content_type_for;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{parse_iso_date, validate_amount};

/// 作成フォームのライフサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewBillState {
    /// 初期状態
    Empty,
    /// 添付ファイルが受理された
    FileValidated,
    /// 必須項目がそろった
    Ready,
    /// 送信済み（終端）
    Submitted,
}

/// ファイル選択イベントで渡されるファイル
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new<S: Into<String>>(name: S, content_type: S, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// ファイル名の拡張子からContent-Typeを推定して作成する
    pub fn from_bytes<S: Into<String>>(name: S, data: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            data,
        }
    }
}

/// 送信時点のフォーム入力値（DOMの値をそのまま保持する）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// 作成中の請求書
///
/// 作成フォームの1セッションの間だけコントローラーが保持する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub expense_type: Option<ExpenseType>,
    pub name: String,
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub vat: String,
    pub pct: f64,
    pub commentary: Option<String>,
    pub attachment: Option<Attachment>,
    /// アップロード時にストアが割り当てた識別子
    ///
    /// 請求書レコードには含めず、送信ログでアップロードとレコードを対応付けるために使う。
    pub key: Option<String>,
}

impl Draft {
    /// フォームの入力値を取り込む
    ///
    /// 金額が数値として読めない場合は未入力として扱う。
    /// VAT率が空または不正な場合は既定値（20）を使用する。
    pub fn apply_form(&mut self, form: &NewBillForm) -> AppResult<()> {
        self.expense_type = match form.expense_type.trim() {
            "" => None,
            value => Some(value.parse()?),
        };
        self.name = form.name.trim().to_string();
        self.date = Some(form.date.trim().to_string()).filter(|date| !date.is_empty());
        self.amount = form.amount.trim().parse::<f64>().ok();
        self.vat = form.vat.trim().to_string();
        self.pct = form.pct.trim().parse::<f64>().unwrap_or(DEFAULT_PCT);
        self.commentary = Some(form.commentary.clone()).filter(|c| !c.is_empty());
        Ok(())
    }

    /// 必須のテキスト項目（日付・金額）がそろっているか
    pub fn has_required_fields(&self) -> bool {
        self.date.is_some() && self.amount.is_some()
    }

    /// 添付ファイルを設定する
    pub fn attach(&mut self, attachment: Attachment, key: Option<String>) {
        self.attachment = Some(attachment);
        self.key = key;
    }

    /// セッションのメールアドレスと合わせて請求書レコードを組み立てる
    ///
    /// 添付ファイルが無い場合もレコードは作成できる。
    /// ステータスは常に `pending`。
    pub fn build_bill(&self, email: Option<&str>) -> AppResult<Bill> {
        let email = email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::session("セッションにメールアドレスがありません"))?;

        let date = self
            .date
            .as_deref()
            .ok_or_else(|| AppError::validation("日付は必須です"))?;
        parse_iso_date(date)?;

        let amount = self
            .amount
            .ok_or_else(|| AppError::validation("金額は必須です"))?;
        validate_amount(amount)?;

        Ok(Bill {
            id: None,
            email: email.to_string(),
            expense_type: self.expense_type,
            name: self.name.clone(),
            date: date.to_string(),
            amount,
            vat: self.vat.clone(),
            pct: self.pct,
            commentary: self.commentary.clone(),
            attachment: self.attachment.clone(),
            status: BillStatus::Pending,
        })
    }
}
