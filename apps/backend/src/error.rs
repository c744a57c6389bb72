use thiserror::Error;

use crate::domain::dealing::DeckError;
use crate::domain::game::BeginRoundError;
use crate::domain::round::RoundError;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::protocol::events::{GameEvent, SuggestedAction};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Storage error: {detail}")]
    Storage { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Storage { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Storage { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => detail,
        }
    }

    /// Validation failures leave the game untouched, so the client may retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn game_not_found(game_id: &str) -> Self {
        Self::NotFound {
            code: ErrorCode::GameNotFound,
            detail: format!("Game {game_id} not found"),
        }
    }

    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage {
            code: ErrorCode::StorageError,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Build the unsequenced error event addressed to the issuing client.
    ///
    /// Rejected commands become `TurnError`; anything that leaves the game in
    /// an unknown state becomes a non-recoverable `GameError`.
    pub fn to_error_event(&self) -> GameEvent {
        match self {
            AppError::Validation { code, detail } => GameEvent::TurnError {
                error_code: *code,
                error_message: detail.clone(),
            },
            AppError::NotFound { detail, .. } => GameEvent::GameError {
                message: detail.clone(),
                recoverable: false,
                suggested_action: SuggestedAction::ReturnToMatchmaking,
            },
            AppError::Storage { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => GameEvent::GameError {
                message: detail.clone(),
                recoverable: false,
                suggested_action: SuggestedAction::ReturnToMatchmaking,
            },
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::InvalidState => ErrorCode::InvalidState,
                    ValidationKind::WrongPlayer => ErrorCode::WrongPlayer,
                    ValidationKind::InvalidCard => ErrorCode::InvalidCard,
                    ValidationKind::InvalidSelection => ErrorCode::InvalidSelection,
                    ValidationKind::InvalidSession => ErrorCode::InvalidSession,
                    ValidationKind::ParseCard => ErrorCode::ParseCard,
                    ValidationKind::Other(_) => ErrorCode::ValidationError,
                };
                AppError::Validation { code, detail }
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Game => ErrorCode::GameNotFound,
                    NotFoundKind::Player | NotFoundKind::Other(_) => ErrorCode::WrongPlayer,
                };
                AppError::NotFound { code, detail }
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DataCorruption => AppError::Internal {
                    code: ErrorCode::DataCorruption,
                    detail,
                },
                InfraErrorKind::Storage | InfraErrorKind::Other(_) => AppError::Storage {
                    code: ErrorCode::StorageError,
                    detail,
                },
            },
        }
    }
}

impl From<DeckError> for AppError {
    fn from(e: DeckError) -> Self {
        AppError::internal(format!("deal failed: {e}"))
    }
}

impl From<RoundError> for AppError {
    fn from(e: RoundError) -> Self {
        match e {
            RoundError::Rejected(de) => de.into(),
            RoundError::Capture(me) => AppError::internal(me.to_string()),
        }
    }
}

impl From<BeginRoundError> for AppError {
    fn from(e: BeginRoundError) -> Self {
        match e {
            BeginRoundError::Rejected(de) => de.into(),
            BeginRoundError::Deck(de) => de.into(),
        }
    }
}
