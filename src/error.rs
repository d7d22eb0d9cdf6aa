//! Centralized error types for the Souq admin dashboard.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages. All error types use `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

use crate::api::{ApiError, ErrorKind};
use crate::config::ConfigError;
use crate::i18n::Language;

/// The main application error type.
///
/// This enum aggregates all error types that can occur in the dashboard,
/// providing user-friendly error messages while preserving the underlying
/// error context for debugging.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A screen panicked while drawing or handling input.
    #[error("Unexpected failure: {0}")]
    Panic(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    ///
    /// This returns a message suitable for showing to users in the UI,
    /// without technical jargon or stack traces.
    pub fn user_message(&self, lang: Language) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => lang
                    .pick(
                        "Could not find configuration directory. Please check your system settings.",
                        "تعذر العثور على مجلد الإعدادات. يرجى التحقق من إعدادات النظام.",
                    )
                    .to_string(),
                ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => lang
                    .pick(
                        "Could not save configuration. Please check file permissions.",
                        "تعذر حفظ الإعدادات. يرجى التحقق من صلاحيات الملفات.",
                    )
                    .to_string(),
                ConfigError::ReadError(_) => lang
                    .pick(
                        "Could not read configuration file. Please check the file exists and is readable.",
                        "تعذرت قراءة ملف الإعدادات.",
                    )
                    .to_string(),
                ConfigError::ParseError(_) => lang
                    .pick(
                        "Configuration file is invalid. Please check the file format.",
                        "ملف الإعدادات غير صالح. يرجى التحقق من تنسيقه.",
                    )
                    .to_string(),
                ConfigError::SerializeError(_) => lang
                    .pick(
                        "Could not save configuration. Internal error.",
                        "تعذر حفظ الإعدادات. خطأ داخلي.",
                    )
                    .to_string(),
                ConfigError::ValidationError(msg) => {
                    format!("{}: {}", lang.pick("Configuration error", "خطأ في الإعدادات"), msg)
                }
            },
            AppError::Api(e) => match e {
                ApiError::Unauthorized => lang
                    .pick(
                        "Authentication failed. Please check your email and password.",
                        "فشل تسجيل الدخول. يرجى التحقق من البريد الإلكتروني وكلمة المرور.",
                    )
                    .to_string(),
                ApiError::Forbidden => lang
                    .pick(
                        "Access denied. You don't have permission to access this resource.",
                        "تم رفض الوصول. لا تملك صلاحية الوصول إلى هذا المورد.",
                    )
                    .to_string(),
                ApiError::NotFound(resource) => {
                    format!("'{}' {}", resource, lang.pick("was not found.", "غير موجود."))
                }
                ApiError::Validation(msg) => {
                    format!("{}: {}", lang.pick("Invalid data", "بيانات غير صالحة"), msg)
                }
                ApiError::Conflict(msg) => {
                    format!("{}: {}", lang.pick("Conflict", "تعارض"), msg)
                }
                ApiError::ServerError(_) => lang
                    .pick(
                        "Server error. Please try again later.",
                        "خطأ في الخادم. يرجى المحاولة لاحقا.",
                    )
                    .to_string(),
                ApiError::Network(_) => lang
                    .pick(
                        "Connection failed. Please check your internet connection.",
                        "فشل الاتصال. يرجى التحقق من اتصالك بالإنترنت.",
                    )
                    .to_string(),
                ApiError::Timeout(ms) => format!(
                    "{} ({} ms)",
                    lang.pick("The server took too long to respond", "استغرق الخادم وقتا طويلا للرد"),
                    ms
                ),
                ApiError::Unknown(_) => lang
                    .pick("Something went wrong.", "حدث خطأ ما.")
                    .to_string(),
            },
            AppError::Io(_) => lang
                .pick(
                    "A file operation failed. Please check file permissions.",
                    "فشلت عملية على الملفات. يرجى التحقق من الصلاحيات.",
                )
                .to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Panic(_) => lang.pick("Something went wrong.", "حدث خطأ ما.").to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is critical and requires user acknowledgment.
    ///
    /// Critical errors typically indicate issues that prevent the application
    /// from functioning correctly, such as configuration or authentication problems.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::Api(ApiError::Unauthorized)
                | AppError::Api(ApiError::Forbidden)
                | AppError::Terminal(_)
                | AppError::Panic(_)
        )
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors can be retried or the user can continue working.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Api(e) => matches!(e.kind(), ErrorKind::Network | ErrorKind::Api),
            _ => false,
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self, lang: Language) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => Some(lang.pick(
                "Fix config.toml or remove it to use the defaults.",
                "أصلح ملف config.toml أو احذفه لاستخدام القيم الافتراضية.",
            )),
            AppError::Api(ApiError::Unauthorized) => Some(lang.pick(
                "Sign in again with the admin credentials.",
                "سجل الدخول مجددا ببيانات المسؤول.",
            )),
            AppError::Api(ApiError::Network(_)) | AppError::Api(ApiError::Timeout(_)) => {
                Some(lang.pick("Press 'r' to retry.", "اضغط 'r' لإعادة المحاولة."))
            }
            AppError::Panic(_) => Some(lang.pick(
                "Press 'r' to reload the page.",
                "اضغط 'r' لإعادة تحميل الصفحة.",
            )),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::NoConfigDir;
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let api_err = ApiError::Unauthorized;
        let app_err: AppError = api_err.into();
        assert!(matches!(app_err, AppError::Api(ApiError::Unauthorized)));
    }

    #[test]
    fn test_user_message_unauthorized() {
        let err = AppError::Api(ApiError::Unauthorized);
        let msg = err.user_message(Language::English);
        assert!(msg.contains("Authentication failed"));
        assert!(msg.contains("password"));
    }

    #[test]
    fn test_user_message_is_translated() {
        let err = AppError::Api(ApiError::Unauthorized);
        assert_ne!(err.user_message(Language::Arabic), err.user_message(Language::English));
        assert!(err.user_message(Language::Arabic).contains("فشل"));
    }

    #[test]
    fn test_user_message_not_found() {
        let err = AppError::Api(ApiError::NotFound("users u42".to_string()));
        let msg = err.user_message(Language::English);
        assert!(msg.contains("users u42"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_user_message_validation_keeps_detail() {
        let err = AppError::Api(ApiError::Validation("name cannot be empty".to_string()));
        assert!(err.user_message(Language::English).contains("name cannot be empty"));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError("bad page size".to_string()));
        assert!(err.user_message(Language::English).contains("bad page size"));
    }

    #[test]
    fn test_is_critical() {
        assert!(AppError::Api(ApiError::Unauthorized).is_critical());
        assert!(AppError::Api(ApiError::Forbidden).is_critical());
        assert!(AppError::Config(ConfigError::NoConfigDir).is_critical());
        assert!(AppError::Panic("boom".to_string()).is_critical());
        assert!(!AppError::Api(ApiError::Timeout(100)).is_critical());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AppError::Api(ApiError::Timeout(100)).is_recoverable());
        assert!(AppError::Api(ApiError::NotFound("x".to_string())).is_recoverable());
        assert!(AppError::Api(ApiError::Validation("x".to_string())).is_recoverable());
        assert!(!AppError::Api(ApiError::Unauthorized).is_recoverable());
        assert!(!AppError::Api(ApiError::Unknown("?".to_string())).is_recoverable());
    }

    #[test]
    fn test_suggested_action() {
        let action = AppError::Api(ApiError::Timeout(100)).suggested_action(Language::English);
        assert!(action.unwrap().contains("retry"));
        assert!(AppError::Api(ApiError::Forbidden)
            .suggested_action(Language::English)
            .is_none());
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.user_message(Language::English), "Terminal error: test error");
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert_eq!(err.user_message(Language::Arabic), "something went wrong");
    }
}
