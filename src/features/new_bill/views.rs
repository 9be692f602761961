//! 請求書作成画面のHTMLテンプレート

use crate::features::bills::models::ExpenseType;
use crate::features::bills::views::render_vertical_layout;
use crate::shared::utils::escape_html;

/// 作成フォームを描画する
///
/// # 引数
/// * `file_input` - ファイル入力欄に表示中のファイル名（無効な選択後はNone）
pub fn render_new_bill_page(file_input: Option<&str>) -> String {
    let options: String = ExpenseType::ALL
        .iter()
        .map(|expense_type| format!("<option>{}</option>", escape_html(expense_type.label())))
        .collect();

    let file_value = file_input
        .map(|name| format!(r#" data-file-name="{}""#, escape_html(name)))
        .unwrap_or_default();

    format!(
        r#"<div class="layout">{}<div class="content"><div class="content-header"><div class="content-title">Envoyer une note de frais</div></div><div class="form-newbill-container content-inner"><form data-testid="form-new-bill"><div class="row"><div class="col-md-6"><div class="col-half"><label for="expense-type" class="bold-label">Type de dépense</label><select required class="form-control blue-border" data-testid="expense-type">{options}</select></div><div class="col-half"><label for="expense-name" class="bold-label">Nom de la dépense</label><input type="text" class="form-control blue-border" data-testid="expense-name" placeholder="Vol Paris Londres" /></div><div class="col-half"><label for="datepicker" class="bold-label">Date</label><input required type="date" class="form-control blue-border" data-testid="datepicker" /></div><div class="col-half"><label for="amount" class="bold-label">Montant TTC </label><input required type="number" class="form-control blue-border input-icon input-icon-right" data-testid="amount" placeholder="348"/></div><div class="col-half-row"><div class="flex-col"><label for="vat" class="bold-label">TVA</label><input type="number" class="form-control blue-border" data-testid="vat" placeholder="70" /></div><div class="flex-col"><input required type="number" class="form-control blue-border" data-testid="pct" placeholder="20" /></div></div></div><div class="col-md-6"><div class="col-half"><label for="commentary" class="form-check-label bold-label">Commentaire</label><textarea class="form-control blue-border" data-testid="commentary" rows="3"></textarea></div><div class="col-half"><label for="file" class="bold-label">Justificatif</label><input required type="file" accept=".jpg,.jpeg,.png" class="form-control blue-border" data-testid="file"{file_value} /></div></div></div><div class="row"><div class="col-md-6"><div class="col-half"><button type="submit" id="btn-send-bill" class="btn btn-primary">Envoyer</button></div></div></div></form></div></div></div>"#,
        render_vertical_layout("icon-mail")
    )
}
