//! 从 MusixMatch 解析同步歌词，并按用户设置渲染成多变体歌词表。
//!
//! 核心入口是 [`LyricsResolver`]：给它标题加艺术家（或 MusixMatch
//! 曲目 ID），它负责申请用户令牌、通过 Shazam 定位 ISRC、拉取同步
//! 歌词与众包翻译，然后按当前设置组装注音、翻译与机器翻译兜底。
//! 解析结果缓存的是与设置无关的上游数据，设置变化后无需重新请求。
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use musixmatch_lyrics::{LyricsResolver, MemorySettings, SearchQuery};
//!
//! # async fn run() -> musixmatch_lyrics::Result<()> {
//! let resolver = LyricsResolver::new(Arc::new(MemorySettings::new()))?;
//! let query = SearchQuery {
//!     title: "夜に駆ける".to_string(),
//!     artist: "YOASOBI".to_string(),
//!     page: None,
//! };
//! if let Some(lyrics) = resolver.resolve_by_query(&query).await? {
//!     println!("{}：{} 行", lyrics.title, lyrics.lyric.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod lrc;
pub mod model;
pub mod providers;
pub mod render;
pub mod resolver;
pub mod settings;
pub mod token;

pub use config::JsonFileSettings;
pub use error::{LyricsError, Result};
pub use model::{LyricMap, RenderedLyrics, SearchQuery};
pub use resolver::{Collaborators, LyricsResolver};
pub use settings::{MemorySettings, SettingsProvider, SettingsSnapshot};
