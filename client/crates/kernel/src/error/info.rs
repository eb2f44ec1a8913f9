//! Error Info - Cloneable projection of [`ApiError`]
//!
//! Session state must be snapshot-able, so it stores this projection
//! instead of the full error (whose source is not `Clone`).

use std::collections::BTreeMap;

use serde::Serialize;

use super::kind::ErrorKind;

/// セッション状態に保持されるエラー射影
///
/// UI 層がそのまま描画できるよう、複製・シリアライズ可能です。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// エラー種別
    pub kind: ErrorKind,
    /// HTTP ステータスコード（応答を受信した場合のみ）
    pub status: Option<u16>,
    /// ユーザー向けメッセージ
    pub message: String,
    /// フィールド単位の検証エラー
    pub details: Option<BTreeMap<String, String>>,
}
