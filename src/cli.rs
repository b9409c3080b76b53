//! CLIモジュール

use crate::config::{CliArgs, Config};
use crate::holiday::{generate_holidays, parse_date, HolidayEntry};
use crate::toggl::{TimeEntrySink, TogglClient};
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

/// Toggl Holidays - 平日のみの休暇エントリをTogglに登録
#[derive(Parser, Debug)]
#[command(name = "toggl-holidays")]
#[command(about = "期間内の平日ごとに休暇エントリをTogglに登録", long_about = None)]
pub struct Cli {
    /// 開始日（YYYY-MM-DD形式）
    #[arg(short, long, value_name = "DATE")]
    pub start: Option<String>,

    /// 終了日（YYYY-MM-DD形式）
    #[arg(short, long, value_name = "DATE")]
    pub end: Option<String>,

    /// 休暇の説明
    #[arg(short, long)]
    pub description: Option<String>,

    /// 登録せずに生成されるエントリを表示
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// CLIエントリポイント
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        start: cli.start,
        end: cli.end,
        description: cli.description,
    }
    .validate()?;

    let start = parse_date(&args.start)?;
    let end = parse_date(&args.end)?;
    let holidays = generate_holidays(start, end, &args.description);

    if cli.dry_run {
        print_holidays(&holidays);
        return Ok(());
    }

    let config = Config::from_env()?;
    let client = TogglClient::new(config);

    info!("{}件の休暇エントリを登録します", holidays.len());
    update_holidays(&client, &holidays);

    Ok(())
}

/// 休暇エントリを1件ずつ順番に登録
///
/// 失敗したエントリはログに残して次へ進む。
pub fn update_holidays<S: TimeEntrySink>(sink: &S, holidays: &[HolidayEntry]) {
    for holiday in holidays {
        let date = holiday.date_string();
        match sink.create_time_entry(holiday) {
            Ok(()) => {
                info!(
                    "Holiday \"{}\" on {} added successfully.",
                    holiday.description, date
                );
            }
            Err(e) => {
                error!(
                    "Error adding holiday \"{}\" on {}: {}",
                    holiday.description,
                    date,
                    e.detail()
                );
            }
        }
    }
}

/// dry-run用の一覧出力
fn print_holidays(holidays: &[HolidayEntry]) {
    if holidays.is_empty() {
        println!("対象期間に平日はありません");
        return;
    }

    for holiday in holidays {
        println!(
            "{} ({}) | {} | {}",
            holiday.date_string(),
            holiday.date.format("%a"),
            holiday.description,
            format_hours(holiday.duration)
        );
    }
}

/// 秒を「○時間○分」形式にフォーマット
fn format_hours(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}時間{}分", hours, minutes)
}
