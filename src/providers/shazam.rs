//! 通过 Shazam 搜索接口把查询关键词定位为曲目 ISRC。
//!
//! 只取最匹配的一条结果。目录固定使用 KR 区。

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    error::{LyricsError, Result},
    providers::SongCatalog,
};

const SHAZAM_SEARCH_URL: &str = "https://www.shazam.com/services/amapi/v1/catalog/KR/search";

/// Shazam 客户端。
#[derive(Debug, Clone)]
pub struct ShazamCatalog {
    http: reqwest::Client,
}

impl ShazamCatalog {
    /// 用共享的 HTTP 客户端创建实例。
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SongCatalog for ShazamCatalog {
    #[instrument(skip(self))]
    async fn find_isrc(&self, term: &str) -> Result<Option<String>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(None);
        }

        let query =
            serde_urlencoded::to_string([("term", term), ("types", "songs"), ("limit", "1")])
                .map_err(|e| LyricsError::Internal(format!("编码查询参数失败: {e}")))?;
        let full_url = format!("{SHAZAM_SEARCH_URL}?{query}");
        let response_text = self.http.get(&full_url).send().await?.text().await?;

        tracing::trace!(
            url = full_url,
            response.body = %response_text,
            "原始 JSON 响应"
        );

        let response: SearchResponse = serde_json::from_str(&response_text)?;
        let isrc = response.first_isrc();
        if let Some(isrc) = &isrc {
            info!("找到曲目 ISRC: {isrc}");
        }
        Ok(isrc)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    #[serde(default)]
    songs: SongSection,
}

#[derive(Debug, Default, Deserialize)]
struct SongSection {
    #[serde(default)]
    data: Vec<SongEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct SongEntry {
    #[serde(default)]
    attributes: SongAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct SongAttributes {
    #[serde(default)]
    isrc: Option<String>,
}

impl SearchResponse {
    fn first_isrc(self) -> Option<String> {
        self.results.songs.data.into_iter().next()?.attributes.isrc
    }
}
