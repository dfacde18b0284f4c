//! 定义歌词解析流程中可能发生的各种错误。

use thiserror::Error;

/// 歌词解析库的统一错误类型。
#[derive(Debug, Error)]
pub enum LyricsError {
    /// 网络请求失败。
    #[error("网络请求失败: {0}")]
    Network(String),

    /// JSON 解析失败。
    #[error("解析 JSON 失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 读写本地配置文件失败。
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 上游 API 返回了业务层面的错误状态。
    #[error("上游 API 错误: {0}")]
    Api(String),

    /// 获取用户令牌失败。此类错误会中断整条解析链。
    #[error("获取用户令牌失败: {0}")]
    Auth(String),

    /// 内部逻辑错误或未明确分类的错误。
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for LyricsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LyricsError>;
