use super::models::{Bill, BillStatus};
use crate::shared::errors::AppResult;
use crate::shared::utils::parse_iso_date;
use chrono::Datelike;

/// フランス語ロケールの月の短縮表記（先頭3文字、先頭大文字）
const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// 一覧表示用に整形された請求書の行
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    /// 元のレコード（`date` はISO形式のまま）
    pub bill: Bill,
    /// 表示用の日付
    pub date_label: String,
    /// 表示用のステータス
    pub status_label: &'static str,
}

/// ISO日付を短い表示形式に変換する（例: "2004-04-04" → "4 Avr. 04"）
pub fn format_date(date_str: &str) -> AppResult<String> {
    let date = parse_iso_date(date_str)?;
    let month = MONTHS_FR[date.month0() as usize];
    let year = date.year().rem_euclid(100);
    Ok(format!("{} {month}. {year:02}", date.day()))
}

/// ステータスを表示ラベルに変換する
pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refused",
    }
}

/// レコードを表示用の行に変換する
///
/// 日付が不正な場合はクラッシュせず、生の文字列をそのまま表示する。
pub fn format_bill(bill: Bill) -> BillRow {
    let date_label = match format_date(&bill.date) {
        Ok(label) => label,
        Err(e) => {
            log::warn!("日付を整形できないため生の値を表示します: date={}, error={e}", bill.date);
            bill.date.clone()
        }
    };

    BillRow {
        status_label: format_status(bill.status),
        date_label,
        bill,
    }
}

/// 行を日付の降順（新しい順）に並べる
pub fn sort_by_date_desc(rows: &mut [BillRow]) {
    rows.sort_by(|a, b| b.bill.date.cmp(&a.bill.date));
}
