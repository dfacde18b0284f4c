//! 歌词解析流程中使用的各种数据类型。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 按毫秒偏移排序的歌词行表。
///
/// 值为该时间点的文本变体列表：下标 0 固定是原文行，
/// 之后依次可能追加发音标注、上游翻译与机器翻译兜底。
/// 列表只允许追加，且不会重复加入完全相同的字符串。
pub type LyricMap = BTreeMap<u64, Vec<String>>;

/// 歌词搜索请求。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    /// 曲目标题。
    #[serde(default, alias = "trackTitle")]
    pub title: String,
    /// 艺术家名。
    #[serde(default, alias = "channelName")]
    pub artist: String,
    /// 搜索页码。上游只有一页结果，大于 1 时直接视为未找到。
    #[serde(default)]
    pub page: Option<u32>,
}

/// 提取器输出的"原曲"身份。
///
/// `artist` 为空字符串表示"明确未知/省略"，与"保持原样"不同。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIdentity {
    pub title: String,
    pub artist: String,
}

/// 从宏接口响应中校验出的曲目记录。
///
/// 只能由结构校验成功的响应构造。校验失败的响应整体视为未找到，
/// 绝不部分使用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrackRecord {
    /// MusixMatch 的 `commontrack_id`。
    pub id: u64,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    /// 时长，单位为秒（非毫秒）。
    pub duration_secs: u64,
    pub instrumental: bool,
    pub plain_lyrics: String,
    /// 同步歌词文本。缺失或为空时为 `None`。
    pub synced_lyrics: Option<String>,
}

/// 上游人工翻译候选：匹配的原文行与对应译文。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationCandidate {
    pub source_line: String,
    pub target_text: String,
}

/// 主缓存的缓存值：一次成功解析得到的全部不可变上游数据。
///
/// 不包含任何用户设置，因此设置变化后可以无限期复用，
/// 渲染时再按当前设置重新组装结果。
#[derive(Debug, Clone)]
pub struct RawResolution {
    pub record: RawTrackRecord,
    /// 校验后的非空同步歌词文本。
    pub synced_lyrics_text: String,
    pub translation_candidates: Vec<TranslationCandidate>,
    /// 上游字幕语言是否为日语。
    pub source_is_japanese: bool,
}

/// 按当前设置渲染出的最终歌词结果。
///
/// 每次访问都从缓存的 [`RawResolution`] 重新构造，本身从不缓存。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLyrics {
    pub id: String,
    pub title: String,
    pub album: String,
    pub artist: String,
    /// 播放时长，单位为毫秒。
    pub playtime: u64,
    pub lyric: LyricMap,
    /// 原始同步歌词文本，逐字保留。
    pub lyric_raw: String,
}
