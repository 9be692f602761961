use crate::shared::errors::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 請求書のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }
}

impl FromStr for BillStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(AppError::validation(format!("不明なステータスです: {other}"))),
        }
    }
}

/// 経費カテゴリ（選択肢は固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    RestaurantsEtBars,
    #[serde(rename = "Hôtel et logement")]
    HotelEtLogement,
    #[serde(rename = "Services en ligne")]
    ServicesEnLigne,
    #[serde(rename = "IT et électronique")]
    ItEtElectronique,
    #[serde(rename = "Equipement et matériel")]
    EquipementEtMateriel,
    #[serde(rename = "Fournitures de bureau")]
    FournituresDeBureau,
}

impl ExpenseType {
    /// 作成フォームのセレクトボックスに表示する順序
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::RestaurantsEtBars,
        ExpenseType::HotelEtLogement,
        ExpenseType::ServicesEnLigne,
        ExpenseType::ItEtElectronique,
        ExpenseType::EquipementEtMateriel,
        ExpenseType::FournituresDeBureau,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::RestaurantsEtBars => "Restaurants et bars",
            ExpenseType::HotelEtLogement => "Hôtel et logement",
            ExpenseType::ServicesEnLigne => "Services en ligne",
            ExpenseType::ItEtElectronique => "IT et électronique",
            ExpenseType::EquipementEtMateriel => "Equipement et matériel",
            ExpenseType::FournituresDeBureau => "Fournitures de bureau",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseType::ALL
            .into_iter()
            .find(|expense_type| expense_type.label() == s)
            .ok_or_else(|| AppError::validation(format!("不明な経費カテゴリです: {s}")))
    }
}

/// 添付ファイル（URLとファイル名は常に両方そろう）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_url: String,
    pub file_name: String,
}

impl Attachment {
    /// URLとファイル名の組から添付ファイルを作成する
    ///
    /// # 戻り値
    /// 両方ある場合はSome、両方無い場合はNone、片方だけの場合はエラー
    pub fn from_parts(
        file_url: Option<String>,
        file_name: Option<String>,
    ) -> AppResult<Option<Self>> {
        let file_url = file_url.filter(|url| !url.is_empty());
        let file_name = file_name.filter(|name| !name.is_empty());

        match (file_url, file_name) {
            (Some(file_url), Some(file_name)) => Ok(Some(Self {
                file_url,
                file_name,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(AppError::validation(
                "添付ファイルのURLがありますがファイル名がありません",
            )),
            (None, Some(_)) => Err(AppError::validation(
                "添付ファイル名がありますがURLがありません",
            )),
        }
    }
}

/// 請求書レコード
///
/// `email`・`date`・`amount` を欠いたレコードは作成できない。
/// `date` はソートと比較のためにISO形式の生の値を保持する。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub expense_type: Option<ExpenseType>,
    pub name: String,
    pub date: String,
    pub amount: f64,
    pub vat: String,
    pub pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    #[serde(flatten)]
    pub attachment: Option<Attachment>,
    pub status: BillStatus,
}

impl Bill {
    pub fn file_url(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.file_url.as_str())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.file_name.as_str())
    }
}

/// ストアから受け取る未検証の請求書レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBill {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type", default)]
    pub expense_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vat: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub pct: Option<f64>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// 文字列・数値のどちらで保存されていても文字列として読み込む
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 数値・数値文字列のどちらで保存されていても数値として読み込む
///
/// 数値として読めない値は未設定として扱い、レコード単位の検証に任せる。
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// VAT率が未指定の場合の既定値
pub const DEFAULT_PCT: f64 = 20.0;

impl TryFrom<RawBill> for Bill {
    type Error = AppError;

    fn try_from(raw: RawBill) -> Result<Self, Self::Error> {
        let email = raw
            .email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::validation("メールアドレスがありません"))?;
        let date = raw
            .date
            .filter(|date| !date.is_empty())
            .ok_or_else(|| AppError::validation("日付がありません"))?;
        let amount = raw
            .amount
            .ok_or_else(|| AppError::validation("金額がありません"))?;

        let expense_type = raw
            .expense_type
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<ExpenseType>())
            .transpose()?;

        let status = match raw.status {
            Some(status) => status.parse()?,
            None => BillStatus::Pending,
        };

        Ok(Bill {
            id: raw.id,
            email,
            expense_type,
            name: raw.name.unwrap_or_default(),
            date,
            amount,
            vat: raw.vat.unwrap_or_default(),
            pct: raw.pct.unwrap_or(DEFAULT_PCT),
            commentary: raw.commentary,
            attachment: Attachment::from_parts(raw.file_url, raw.file_name)?,
            status,
        })
    }
}
