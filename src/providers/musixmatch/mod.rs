//! 实现了与 MusixMatch 平台交互的歌词目录客户端。
//!
//! 所有请求都走 `apic.musixmatch.com` 的 1.1 版接口，依赖 Cookie
//! 会话与查询参数中的用户令牌。
//!
//! # 使用流程
//!
//! 1. 调用 `request_token` 取得用户令牌；
//! 2. 用令牌调用 `macro_by_isrc` 或 `macro_by_track_id`，获取曲目
//!    元数据与同步歌词的组合响应；
//! 3. 需要时用解析出的曲目 ID 调用 `translation_candidates` 获取
//!    众包翻译。

use async_trait::async_trait;
use const_format::formatcp;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    error::{LyricsError, Result},
    model::TranslationCandidate,
    providers::LyricsCatalog,
};

pub mod models;

use models::{MacroResponse, TokenResponse, TranslationsResponse};

const API_BASE_URL: &str = "https://apic.musixmatch.com/ws/1.1";
const TOKEN_URL: &str = formatcp!("{API_BASE_URL}/token.get");
const MACRO_SUBTITLES_URL: &str = formatcp!("{API_BASE_URL}/macro.subtitles.get");
const TRACK_TRANSLATIONS_URL: &str = formatcp!("{API_BASE_URL}/crowd.track.translations.get");

const APP_ID: &str = "mac-ios-v2.0";

/// MusixMatch 客户端。
#[derive(Debug, Clone)]
pub struct MusixmatchCatalog {
    http: reqwest::Client,
}

impl MusixmatchCatalog {
    /// 用共享的 HTTP 客户端创建实例。客户端需要启用 Cookie 存储，
    /// 否则 MusixMatch 会拒绝后续请求。
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| LyricsError::Internal(format!("编码查询参数失败: {e}")))?;
        let full_url = format!("{url}?{query}");
        let response_text = self.http.get(&full_url).send().await?.text().await?;

        tracing::trace!(
            url = full_url,
            response.body = %response_text,
            "原始 JSON 响应"
        );

        serde_json::from_str(&response_text).map_err(Into::into)
    }
}

#[async_trait]
impl LyricsCatalog for MusixmatchCatalog {
    #[instrument(skip(self))]
    async fn request_token(&self) -> Result<String> {
        let response: TokenResponse = self.get_json(TOKEN_URL, &[("app_id", APP_ID)]).await?;
        response
            .into_user_token()
            .ok_or_else(|| LyricsError::Auth("MusixMatch 未返回有效的用户令牌".to_string()))
    }

    #[instrument(skip(self, token))]
    async fn macro_by_isrc(&self, isrc: &str, token: &str) -> Result<MacroResponse> {
        self.get_json(
            MACRO_SUBTITLES_URL,
            &[
                ("usertoken", token),
                ("app_id", APP_ID),
                ("track_isrc", isrc),
            ],
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn macro_by_track_id(&self, track_id: u64, token: &str) -> Result<MacroResponse> {
        let track_id = track_id.to_string();
        self.get_json(
            MACRO_SUBTITLES_URL,
            &[
                ("commontrack_id", track_id.as_str()),
                ("usertoken", token),
                ("app_id", APP_ID),
            ],
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn translation_candidates(
        &self,
        track_id: u64,
        token: &str,
        language: &str,
    ) -> Result<Vec<TranslationCandidate>> {
        let track_id = track_id.to_string();
        let response: TranslationsResponse = self
            .get_json(
                TRACK_TRANSLATIONS_URL,
                &[
                    ("app_id", APP_ID),
                    ("usertoken", token),
                    ("commontrack_id", track_id.as_str()),
                    ("selected_language", language),
                ],
            )
            .await?;

        if !response.is_success() {
            return Err(LyricsError::Api(format!(
                "获取众包翻译失败，状态码: {}",
                response.message.header.status_code
            )));
        }
        Ok(response.into_candidates())
    }
}
