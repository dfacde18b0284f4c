//! MyMemory 机器翻译客户端，作为没有上游翻译时的兜底。

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{LyricsError, Result},
    providers::Translator,
};

const MYMEMORY_API_URL: &str = "https://api.mymemory.translated.net/get";

/// MyMemory 客户端。
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    http: reqwest::Client,
}

impl MyMemoryTranslator {
    /// 用共享的 HTTP 客户端创建实例。
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    #[instrument(skip(self, text))]
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<Option<String>> {
        let langpair = format!("{source}|{target}");
        let query = serde_urlencoded::to_string([("q", text), ("langpair", langpair.as_str())])
            .map_err(|e| LyricsError::Internal(format!("编码查询参数失败: {e}")))?;
        let full_url = format!("{MYMEMORY_API_URL}?{query}");
        let response_text = self.http.get(&full_url).send().await?.text().await?;

        tracing::trace!(
            url = full_url,
            response.body = %response_text,
            "原始 JSON 响应"
        );

        let response: TranslateResponse = serde_json::from_str(&response_text)?;
        Ok(response.into_translation())
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "responseData", default)]
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
}

impl TranslateResponse {
    fn into_translation(self) -> Option<String> {
        self.response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.is_empty())
    }
}
