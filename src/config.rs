//! 設定モジュール

use crate::error::ConfigError;

pub const ENV_API_TOKEN: &str = "TOGGL_API_TOKEN";
pub const ENV_WORKSPACE_ID: &str = "TOGGL_WORKSPACE_ID";
pub const ENV_PROJECT_ID: &str = "TOGGL_PROJECT_ID";

/// Toggl接続設定
#[derive(Clone)]
pub struct Config {
    /// APIトークン
    pub api_token: String,
    /// ワークスペースID
    pub workspace_id: i64,
    /// プロジェクトID
    pub project_id: i64,
}

/// CLI引数（検証前）
#[derive(Debug, Default)]
pub struct CliArgs {
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
}

/// 検証済みのCLI引数
#[derive(Debug, PartialEq)]
pub struct RunArgs {
    pub start: String,
    pub end: String,
    pub description: String,
}

impl CliArgs {
    /// 必須引数をバリデート
    ///
    /// 空文字列も未指定として扱う。
    pub fn validate(self) -> Result<RunArgs, ConfigError> {
        match (
            non_empty(self.start),
            non_empty(self.end),
            non_empty(self.description),
        ) {
            (Some(start), Some(end), Some(description)) => Ok(RunArgs {
                start,
                end,
                description,
            }),
            _ => Err(ConfigError::MissingArguments),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Config {
    /// プロセス環境（と`.env`）から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        // .envが無くてもエラーにしない
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のルックアップ関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = required(&lookup, ENV_API_TOKEN)?;
        let workspace_id = parse_id(ENV_WORKSPACE_ID, required(&lookup, ENV_WORKSPACE_ID)?)?;
        let project_id = parse_id(ENV_PROJECT_ID, required(&lookup, ENV_PROJECT_ID)?)?;

        Ok(Self {
            api_token,
            workspace_id,
            project_id,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}

fn parse_id(name: &'static str, value: String) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}
