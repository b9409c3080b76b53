//! 休暇エントリ生成モジュール

use crate::error::DateError;
use chrono::{Datelike, NaiveDate, Weekday};

/// 1日あたりの作業時間（7.5時間を秒で表したもの）
pub const HOLIDAY_DURATION_SECONDS: i64 = 27_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 1日分の休暇エントリ
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayEntry {
    pub description: String,
    pub date: NaiveDate,
    pub duration: i64,
}

impl HolidayEntry {
    /// `YYYY-MM-DD`形式の日付
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// `YYYY-MM-DD`形式の日付をパース
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| DateError::InvalidDate(input.to_string()))
}

/// 土日かどうか
fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 期間内の平日ごとに休暇エントリを生成
///
/// 開始日・終了日ともに含む。`start > end`の場合は空。
pub fn generate_holidays(start: NaiveDate, end: NaiveDate, description: &str) -> Vec<HolidayEntry> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| !is_weekend(*date))
        .map(|date| HolidayEntry {
            description: description.to_string(),
            date,
            duration: HOLIDAY_DURATION_SECONDS,
        })
        .collect()
}
