use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;

/// ISO形式（YYYY-MM-DD）の日付文字列を解析する
///
/// # 引数
/// * `date_str` - 日付文字列
///
/// # 戻り値
/// 解析された日付、または形式が正しくない場合はエラー
pub fn parse_iso_date(date_str: &str) -> AppResult<NaiveDate> {
    // 基本的な形式チェック
    if date_str.len() != 10 {
        return Err(AppError::validation(format!(
            "日付はYYYY-MM-DD形式である必要があります: {date_str}"
        )));
    }

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("無効な日付です: {date_str}")))
}

/// 金額のバリデーション
///
/// # バリデーション規則
/// - 有限の数値であること
/// - 負の値でないこと
pub fn validate_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() {
        return Err(AppError::validation("無効な金額です"));
    }

    if amount < 0.0 {
        return Err(AppError::validation("金額は0以上である必要があります"));
    }

    Ok(())
}

/// HTML特殊文字をエスケープする
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
