//! Api Error - Unified error type for backend calls
//!
//! Defines the [`ApiError`] struct and [`ApiResult<T>`] type alias.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use super::info::ErrorInfo;
use super::kind::ErrorKind;

/// クライアント統一エラー型
///
/// バックエンド呼び出しの失敗を表す標準エラー型です。
/// HTTP 境界で一度だけ構築され、ビルダーパターンで詳細を付加できます。
///
/// ## Fields
/// * `kind` - エラーの分類（[`ErrorKind`]）
/// * `status` - 受信した HTTP ステータスコード（応答がある場合のみ）
/// * `message` - ユーザー向けのエラーメッセージ
/// * `details` - フィールド単位の検証エラー（オプション）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::api_error::ApiError;
///
/// // 応答なし
/// let err = ApiError::network("Connection refused");
///
/// // 検証エラー
/// let err = ApiError::validation(422, "Invalid account data")
///     .with_field("username", "Username is already taken");
/// ```
pub struct ApiError {
    /// エラー種別
    kind: ErrorKind,
    /// HTTP ステータスコード（応答を受信した場合のみ）
    status: Option<u16>,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// フィールド単位の検証エラー
    details: Option<BTreeMap<String, String>>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// クライアント結果型エイリアス
///
/// `Result<T, ApiError>` の省略形です。
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 応答を受信できなかったエラー
    #[inline]
    pub fn network(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// エラーステータス付きの応答
    #[inline]
    pub fn server(status: u16, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Server, message).with_status(status)
    }

    /// フィールド単位の検証エラーを含む応答
    #[inline]
    pub fn validation(status: u16, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation, message).with_status(status)
    }

    /// セッション期限切れ応答（401/403）
    #[inline]
    pub fn auth_expired(status: u16) -> Self {
        Self::new(ErrorKind::AuthExpired, "Session expired or invalid").with_status(status)
    }

    /// リクエスト送信前の失敗
    #[inline]
    pub fn setup(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Setup, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// HTTP ステータスコードを設定
    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// フィールド単位の検証エラーを設定
    #[inline]
    pub fn with_details(mut self, details: BTreeMap<String, String>) -> Self {
        self.details = Some(details);
        self
    }

    /// 単一フィールドの検証エラーを追加
    #[inline]
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), message.into());
        self
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// フィールド単位の検証エラーを取得
    #[inline]
    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        self.details.as_ref()
    }

    /// セッション期限切れエラーかどうか
    #[inline]
    pub fn is_auth_expired(&self) -> bool {
        self.kind.is_auth_expired()
    }

    /// セッション状態に保持できる複製可能な射影を取得
    ///
    /// `source` は `Clone` できないため射影には含まれません。
    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.kind,
            status: self.status,
            message: self.message.to_string(),
            details: self.details.clone(),
        }
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("ApiError");
        builder.field("kind", &self.kind);
        if let Some(status) = self.status {
            builder.field("status", &status);
        }
        builder.field("message", &self.message);
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = ApiError::new(ErrorKind::Server, "Something went wrong");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.message(), "Something went wrong");
        assert!(err.status().is_none());
        assert!(err.details().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(ApiError::network("test").kind(), ErrorKind::Network);
        assert_eq!(ApiError::server(500, "test").status(), Some(500));
        assert_eq!(ApiError::validation(422, "test").kind(), ErrorKind::Validation);
        assert_eq!(ApiError::auth_expired(401).kind(), ErrorKind::AuthExpired);
        assert_eq!(ApiError::auth_expired(403).status(), Some(403));
        assert_eq!(ApiError::setup("test").kind(), ErrorKind::Setup);
    }

    #[test]
    fn test_with_field() {
        let err = ApiError::validation(400, "Invalid account data")
            .with_field("username", "Required")
            .with_field("password", "Too short");
        let details = err.details().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details.get("username").map(String::as_str), Some("Required"));
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::network("Connection refused").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = ApiError::server(500, "Internal failure");
        assert_eq!(err.to_string(), "[Server Error] Internal failure (HTTP 500)");

        let err = ApiError::network("Connection reset");
        assert_eq!(err.to_string(), "[Network Error] Connection reset");
    }

    #[test]
    fn test_to_info() {
        let err = ApiError::validation(422, "Invalid data").with_field("email", "Invalid format");
        let info = err.to_info();
        assert_eq!(info.kind, ErrorKind::Validation);
        assert_eq!(info.status, Some(422));
        assert_eq!(info.message, "Invalid data");
        assert_eq!(
            info.details.unwrap().get("email").map(String::as_str),
            Some("Invalid format")
        );
    }
}
