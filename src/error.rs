//! エラー型定義モジュール

use reqwest::StatusCode;
use thiserror::Error;

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Start date, end date, and description are required.")]
    MissingArguments,

    #[error("環境変数が設定されていません: {0}")]
    MissingEnv(&'static str),

    #[error("環境変数の値が不正です: {name}={value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// 日付エラー
#[derive(Error, Debug)]
pub enum DateError {
    #[error("無効な日付: {0}")]
    InvalidDate(String),
}

/// Toggl API呼び出しエラー
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTPステータス {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("通信エラー: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RemoteError {
    /// ログ用の詳細（レスポンス本文、なければ低レベルのエラーメッセージ）
    pub fn detail(&self) -> String {
        match self {
            RemoteError::Status { status, body } if body.is_empty() => status.to_string(),
            RemoteError::Status { body, .. } => body.clone(),
            RemoteError::Transport(e) => e.to_string(),
        }
    }
}
