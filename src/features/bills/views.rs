//! 請求書一覧画面のHTMLテンプレート
//!
//! `data-testid` 属性はUIとの契約なので変更しないこと。

use super::formatter::BillRow;
use crate::shared::utils::escape_html;

/// 一覧画面の表示状態
#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    /// 一覧取得中
    Loading,
    /// 一覧取得に失敗（ストアのエラーメッセージをそのまま保持）
    Error(String),
    /// 一覧取得済み（日付の降順）
    Loaded(Vec<BillRow>),
}

impl BillsPage {
    /// 表示中の行
    pub fn rows(&self) -> &[BillRow] {
        match self {
            BillsPage::Loaded(rows) => rows,
            _ => &[],
        }
    }

    /// 表示中の行数
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// 表示中の行の日付（ISO形式、表示順）
    pub fn dates(&self) -> Vec<&str> {
        self.rows().iter().map(|row| row.bill.date.as_str()).collect()
    }
}

/// 添付ファイルのプレビューモーダル
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentModal {
    /// 表示する添付ファイルのURL（無い場合は空のモーダル）
    pub file_url: Option<String>,
    /// 画像の表示幅（モーダル幅の半分）
    pub image_width: u32,
}

impl AttachmentModal {
    pub fn new(file_url: Option<&str>, modal_width: u32) -> Self {
        Self {
            file_url: file_url.filter(|url| !url.is_empty()).map(str::to_string),
            image_width: modal_width / 2,
        }
    }

    /// モーダル本体のHTML
    pub fn body_html(&self) -> String {
        match &self.file_url {
            Some(url) => format!(
                r#"<div style="text-align: center;" class="bill-proof-container"><img width={} src="{}" alt="Bill" /></div>"#,
                self.image_width,
                escape_html(url)
            ),
            None => String::new(),
        }
    }
}

/// 縦型ナビゲーション（アクティブなアイコンを強調表示）
pub fn render_vertical_layout(active_icon: &str) -> String {
    let class_for = |test_id: &str| {
        if test_id == active_icon {
            "active-icon"
        } else {
            ""
        }
    };

    format!(
        r#"<div class="vertical-navbar"><div class="layout-title">Billed</div><div id="layout-icon1" data-testid="icon-window" class="{}"></div><div id="layout-icon2" data-testid="icon-mail" class="{}"></div></div>"#,
        class_for("icon-window"),
        class_for("icon-mail")
    )
}

fn render_row(row: &BillRow) -> String {
    let bill = &row.bill;
    let expense_type = bill.expense_type.map(|t| t.label()).unwrap_or_default();

    format!(
        r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{} €</td><td>{}</td><td><div class="icon-actions"><div id="eye" data-testid="icon-eye" data-bill-url="{}"></div></div></td></tr>"#,
        escape_html(expense_type),
        escape_html(&bill.name),
        escape_html(&row.date_label),
        bill.amount,
        row.status_label,
        escape_html(bill.file_url().unwrap_or_default())
    )
}

/// プレビューモーダル（開いている場合は本体を含める）
pub fn render_modal(modal: Option<&AttachmentModal>) -> String {
    let (class, body) = match modal {
        Some(modal) => ("modal fade show", modal.body_html()),
        None => ("modal fade", String::new()),
    };

    format!(
        r#"<div class="{class}" id="modaleFile" data-testid="modaleFile" tabindex="-1" role="dialog" aria-hidden="true"><div class="modal-dialog modal-dialog-centered modal-lg" role="document"><div class="modal-content"><div class="modal-header"><h5 class="modal-title">Justificatif</h5></div><div class="modal-body">{body}</div></div></div></div>"#
    )
}

/// 読み込み中画面
pub fn render_loading_page() -> String {
    format!(
        r#"<div class="layout">{}<div class="content" id="loading">Loading...</div></div>"#,
        render_vertical_layout("icon-window")
    )
}

/// エラー画面（ストアのメッセージをそのまま表示）
pub fn render_error_page(message: &str) -> String {
    format!(
        r#"<div class="layout">{}<div class="content"><div class="content-header"><div class="content-title">Erreur</div></div><div data-testid="error-message">{}</div></div></div>"#,
        render_vertical_layout("icon-window"),
        escape_html(message)
    )
}

/// 一覧画面全体を描画する
pub fn render_bills_page(page: &BillsPage, modal: Option<&AttachmentModal>) -> String {
    let rows = match page {
        BillsPage::Loading => return render_loading_page(),
        BillsPage::Error(message) => return render_error_page(message),
        BillsPage::Loaded(rows) => rows.iter().map(render_row).collect::<String>(),
    };

    format!(
        r#"<div class="layout">{}<div class="content"><div class="content-header"><div class="content-title">Mes notes de frais</div><button type="button" data-testid="btn-new-bill" class="btn btn-primary">Nouvelle note de frais</button></div><div id="data-table"><table id="example" class="table table-striped" style="width:100%"><thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead><tbody data-testid="tbody">{rows}</tbody></table></div></div>{}</div>"#,
        render_vertical_layout("icon-window"),
        render_modal(modal)
    )
}
