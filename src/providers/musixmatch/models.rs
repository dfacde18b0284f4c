//! MusixMatch API 的响应模型。
//!
//! `macro.subtitles.get` 把多个子调用打包在一个响应里，各子调用
//! 独立成功或失败；失败的子调用会把 `body` 返回成空数组而不是
//! 对象，所以各层 `body` 都按宽松方式反序列化，形状不符时视为缺失。

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::model::{RawTrackRecord, TranslationCandidate};

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// 通用响应头，只关心状态码。
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatusHeader {
    #[serde(default)]
    pub status_code: i64,
}

/// `token.get` 的响应。
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub message: TokenMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenMessage {
    #[serde(default)]
    pub header: StatusHeader,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<TokenBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenBody {
    #[serde(default)]
    pub user_token: Option<String>,
}

impl TokenResponse {
    /// 提取有效的用户令牌。状态码非 200 或令牌为空时返回 `None`。
    #[must_use]
    pub fn into_user_token(self) -> Option<String> {
        if self.message.header.status_code != 200 {
            return None;
        }
        self.message
            .body
            .and_then(|body| body.user_token)
            .filter(|token| !token.is_empty())
    }
}

/// `macro.subtitles.get` 的组合响应。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroResponse {
    #[serde(default)]
    pub message: MacroMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroMessage {
    #[serde(default)]
    pub header: StatusHeader,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<MacroBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroBody {
    #[serde(default)]
    pub macro_calls: MacroCalls,
}

/// 各子调用的结果，字段名对应上游的调用名。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroCalls {
    #[serde(rename = "matcher.track.get", default, deserialize_with = "lenient")]
    pub matcher_track: Option<MatcherTrackCall>,
    #[serde(rename = "track.lyrics.get", default, deserialize_with = "lenient")]
    pub track_lyrics: Option<TrackLyricsCall>,
    #[serde(
        rename = "track.subtitles.get",
        default,
        deserialize_with = "lenient"
    )]
    pub track_subtitles: Option<TrackSubtitlesCall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatcherTrackCall {
    #[serde(default)]
    pub message: MatcherTrackMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatcherTrackMessage {
    #[serde(default)]
    pub header: StatusHeader,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<MatcherTrackBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatcherTrackBody {
    #[serde(default)]
    pub track: Option<TrackInfo>,
}

/// 曲目元数据。任一必要字段缺失时整条记录视为无效。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackInfo {
    #[serde(default)]
    pub commontrack_id: Option<u64>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    /// 时长，单位是秒。
    #[serde(default)]
    pub track_length: Option<u64>,
    /// 纯音乐标记，0 或 1。
    #[serde(default)]
    pub instrumental: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackLyricsCall {
    #[serde(default)]
    pub message: TrackLyricsMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackLyricsMessage {
    #[serde(default)]
    pub header: StatusHeader,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackSubtitlesCall {
    #[serde(default)]
    pub message: TrackSubtitlesMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackSubtitlesMessage {
    #[serde(default)]
    pub header: StatusHeader,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<TrackSubtitlesBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackSubtitlesBody {
    #[serde(default)]
    pub subtitle_list: Vec<SubtitleEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtitleEntry {
    #[serde(default)]
    pub subtitle: Option<SubtitleInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtitleInfo {
    #[serde(default)]
    pub subtitle_body: Option<String>,
    #[serde(default)]
    pub subtitle_language: Option<String>,
}

impl MacroResponse {
    /// `track.lyrics.get` 子调用是否成功。整个组合响应以该状态码
    /// 判定成败，外层状态码不可靠。
    #[must_use]
    pub fn lyrics_call_succeeded(&self) -> bool {
        self.message
            .body
            .as_ref()
            .and_then(|body| body.macro_calls.track_lyrics.as_ref())
            .is_some_and(|call| call.message.header.status_code == 200)
    }

    /// 第一条字幕的语言代码。
    #[must_use]
    pub fn subtitle_language(&self) -> Option<&str> {
        self.first_subtitle()?.subtitle_language.as_deref()
    }

    /// 把组合响应整理成曲目记录。任一必要字段缺失时返回 `None`。
    ///
    /// 同步歌词取第一条字幕的内容，为空时记为 `None`。
    #[must_use]
    pub fn to_track_record(&self) -> Option<RawTrackRecord> {
        let track = self
            .message
            .body
            .as_ref()?
            .macro_calls
            .matcher_track
            .as_ref()?
            .message
            .body
            .as_ref()?
            .track
            .as_ref()?;
        let subtitle_body = self
            .first_subtitle()
            .and_then(|subtitle| subtitle.subtitle_body.clone());

        Some(RawTrackRecord {
            id: track.commontrack_id?,
            track_name: track.track_name.clone()?,
            artist_name: track.artist_name.clone()?,
            album_name: track.album_name.clone()?,
            duration_secs: track.track_length?,
            instrumental: track.instrumental.unwrap_or(0) != 0,
            plain_lyrics: subtitle_body.clone().unwrap_or_default(),
            synced_lyrics: subtitle_body.filter(|body| !body.is_empty()),
        })
    }

    fn first_subtitle(&self) -> Option<&SubtitleInfo> {
        self.message
            .body
            .as_ref()?
            .macro_calls
            .track_subtitles
            .as_ref()?
            .message
            .body
            .as_ref()?
            .subtitle_list
            .first()?
            .subtitle
            .as_ref()
    }
}

/// `crowd.track.translations.get` 的响应。
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationsResponse {
    #[serde(default)]
    pub message: TranslationsMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationsMessage {
    #[serde(default)]
    pub header: StatusHeader,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<TranslationsBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationsBody {
    #[serde(default)]
    pub translations_list: Vec<TranslationEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationEntry {
    #[serde(default)]
    pub translation: Option<TranslationInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationInfo {
    /// 译文对应的原文行。
    #[serde(default)]
    pub subtitle_matched_line: Option<String>,
    /// 译文本身。
    #[serde(default)]
    pub description: Option<String>,
}

impl TranslationsResponse {
    /// 响应头是否为成功状态。
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.message.header.status_code == 200
    }

    /// 摊平为翻译候选列表，丢弃缺少原文或译文的条目。
    #[must_use]
    pub fn into_candidates(self) -> Vec<TranslationCandidate> {
        let Some(body) = self.message.body else {
            return Vec::new();
        };
        body.translations_list
            .into_iter()
            .filter_map(|entry| {
                let info = entry.translation?;
                Some(TranslationCandidate {
                    source_line: info.subtitle_matched_line?,
                    target_text: info.description?,
                })
            })
            .collect()
    }
}
