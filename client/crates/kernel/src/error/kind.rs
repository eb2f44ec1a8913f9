//! Error Kind - Classification of request failures
//!
//! Defines the [`ErrorKind`] enum produced once at the HTTP boundary.

use serde::Serialize;

/// エラー種別の列挙体
///
/// リクエスト失敗の分類を定義します。HTTP 境界で一度だけ分類され、
/// 以降は型付きの match で消費されます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::from_status(401, false);
/// assert_eq!(kind, ErrorKind::AuthExpired);
/// assert_eq!(kind.as_str(), "Session Expired");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// リクエストは送信されたが、応答を受信できなかった
    Network,
    /// エラーステータス付きの応答を受信した
    Server,
    /// 4xx 応答にフィールド単位の検証エラーが含まれる
    Validation,
    /// 401/403 - セッションが無効または期限切れ
    AuthExpired,
    /// リクエストが送信される前に失敗した
    Setup,
}

impl ErrorKind {
    /// 応答ステータスからエラー種別を分類
    ///
    /// ## Arguments
    /// * `status` - 受信した HTTP ステータスコード
    /// * `has_field_errors` - 応答ボディにフィールド単位のエラーが含まれるか
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::from_status(403, false), ErrorKind::AuthExpired);
    /// assert_eq!(ErrorKind::from_status(422, true), ErrorKind::Validation);
    /// assert_eq!(ErrorKind::from_status(500, false), ErrorKind::Server);
    /// ```
    #[inline]
    pub const fn from_status(status: u16, has_field_errors: bool) -> Self {
        if status == 401 || status == 403 {
            ErrorKind::AuthExpired
        } else if has_field_errors && status >= 400 && status < 500 {
            ErrorKind::Validation
        } else {
            ErrorKind::Server
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "Network Error",
            ErrorKind::Server => "Server Error",
            ErrorKind::Validation => "Validation Error",
            ErrorKind::AuthExpired => "Session Expired",
            ErrorKind::Setup => "Request Setup Error",
        }
    }

    /// セッション期限切れエラーかどうかを判定
    ///
    /// このエラーのみがログイン画面へのリダイレクトを発生させます。
    #[inline]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, ErrorKind::AuthExpired)
    }

    /// 応答を受信したエラーかどうかを判定
    ///
    /// `Network` と `Setup` は応答を受信していないため `false` を返します。
    #[inline]
    pub const fn is_response_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::Server | ErrorKind::Validation | ErrorKind::AuthExpired
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
