//! 解析器依赖的外部服务接口，以及各服务的具体客户端。
//!
//! - [`musixmatch`]：曲目、同步歌词与众包翻译的主数据源；
//! - [`shazam`]：按关键词查询曲目 ISRC；
//! - [`mymemory`]：没有上游翻译时的机器翻译兜底。

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::{LyricsError, Result},
    model::TranslationCandidate,
};

pub mod musixmatch;
pub mod mymemory;
pub mod shazam;

pub use musixmatch::models::MacroResponse;

/// 请求各服务时使用的桌面浏览器 User-Agent。
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// 歌词目录接口，由 MusixMatch 客户端实现。
#[async_trait]
pub trait LyricsCatalog: Send + Sync {
    /// 申请一个新的用户令牌。
    async fn request_token(&self) -> Result<String>;

    /// 按 ISRC 查询曲目信息与同步歌词的组合响应。
    async fn macro_by_isrc(&self, isrc: &str, token: &str) -> Result<MacroResponse>;

    /// 按曲目 ID 查询曲目信息与同步歌词的组合响应。
    async fn macro_by_track_id(&self, track_id: u64, token: &str) -> Result<MacroResponse>;

    /// 获取指定曲目在目标语言下的众包翻译。
    async fn translation_candidates(
        &self,
        track_id: u64,
        token: &str,
        language: &str,
    ) -> Result<Vec<TranslationCandidate>>;
}

/// 按关键词定位曲目 ISRC 的接口，由 Shazam 客户端实现。
#[async_trait]
pub trait SongCatalog: Send + Sync {
    /// 查询与关键词最匹配的曲目的 ISRC，没有结果时返回 `None`。
    async fn find_isrc(&self, term: &str) -> Result<Option<String>>;
}

/// 机器翻译接口，由 MyMemory 客户端实现。
#[async_trait]
pub trait Translator: Send + Sync {
    /// 把 `text` 从 `source` 语言翻译到 `target` 语言。
    /// 服务正常但没有可用译文时返回 `None`。
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<Option<String>>;
}

/// 同步的发音标注接口，例如把日语句子转写为韩文读法。
///
/// 实现应是纯计算，不做网络请求。
pub trait Transliterator: Send + Sync {
    /// 为一行文本生成注音。
    fn transliterate(&self, text: &str) -> Result<String>;
}

/// 构建各客户端共享的 HTTP 客户端。
///
/// 启用 Cookie 存储以满足 MusixMatch 的会话要求，超时 10 秒。
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(DESKTOP_USER_AGENT)
        .cookie_store(true)
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| LyricsError::Internal(format!("构建 HTTP 客户端失败: {e}")))
}
