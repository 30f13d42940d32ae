//! Error types for the raidadmin library
//!
//! Errors are grouped by what went wrong for the caller: access checks,
//! the form contract, uploaded data and missing raids.

use thiserror::Error;

/// Main error type for the raidadmin library
#[derive(Error, Debug)]
pub enum AdminError {
    /// Viewer is neither administrator nor moderator
    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    /// The page was requested without the dispatching script URL
    #[error("Page rendered without a script URL")]
    MissingScript,

    #[error("Raid not found: {0}")]
    RaidNotFound(u64),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Form field validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Uploaded raid data could not be understood
    #[error("Data file error: {reason}")]
    DataFile { reason: String },

    #[error("Uploaded file is {size} bytes, limit is {limit}")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors in submitted form fields
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field value: {field} - {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Field {field} still holds its prompt text")]
    PromptText { field: String },
}

/// Shorthand result type for raidadmin operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// Short result text shown when the viewer lacks both admin roles
pub const ACCESS_DENIED_MESSAGE: &str = "Нет прав на администрирование";

impl AdminError {
    pub fn access_denied() -> Self {
        AdminError::AccessDenied {
            message: ACCESS_DENIED_MESSAGE.to_string(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        AdminError::Validation(ValidationError::MissingField {
            field: field.to_string(),
        })
    }

    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        AdminError::Validation(ValidationError::InvalidFieldValue {
            field: field.to_string(),
            reason: reason.into(),
        })
    }

    /// Short result message for the page banner
    pub fn user_message(&self) -> String {
        match self {
            AdminError::AccessDenied { message } => message.clone(),
            AdminError::MissingScript => "Страница недоступна".to_string(),
            AdminError::RaidNotFound(id) => format!("Марш-бросок {} не найден", id),
            AdminError::UnknownAction(action) => format!("Неизвестное действие: {}", action),
            AdminError::Validation(e) => match e {
                ValidationError::MissingField { field } => {
                    format!("Не заполнено поле {}", field)
                }
                ValidationError::InvalidFieldValue { field, reason } => {
                    format!("Неверное значение поля {}: {}", field, reason)
                }
                ValidationError::PromptText { field } => {
                    format!("Поле {} содержит текст подсказки", field)
                }
            },
            AdminError::DataFile { reason } => format!("Ошибка в файле данных: {}", reason),
            AdminError::FileTooLarge { limit, .. } => {
                format!("Файл превышает допустимый размер {} байт", limit)
            }
            AdminError::Serialization(_) => "Ошибка формирования данных".to_string(),
        }
    }

    /// Whether the viewer can fix this by resubmitting the form
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdminError::Validation(_) | AdminError::DataFile { .. } | AdminError::FileTooLarge { .. }
        )
    }
}
