use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Depolama kullanılamıyor: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Depolama kullanılamıyor: {0}")]
    Storage(String),

    #[error("{0}")]
    Validation(String),

    #[error("Bulunamadı: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Valideringsfel visas som blockerande meddelande i formuläret
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_message() {
        let err = AppError::storage("låset är förgiftat");
        assert_eq!(err.to_string(), "Depolama kullanılamıyor: låset är förgiftat");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::validation("Lütfen müşteri seçiniz");
        assert_eq!(err.to_string(), "Lütfen müşteri seçiniz");
        assert!(err.is_validation());
    }
}
