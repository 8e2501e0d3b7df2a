use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Empty store: no ending records available")]
    EmptyStore,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 转换为面向用户的提示文本（由机器人直接回复给用户）
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::EmptyStore => "当前没有任何doro结局数据！".to_string(),
            _ => {
                log::error!("Internal error: {self}");
                "操作失败，请稍后重试".to_string()
            }
        }
    }
}
