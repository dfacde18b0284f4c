//! 歌词解析的编排层。
//!
//! 一次按查询的解析依次经过：设置快照、原曲信息提取、缓存查找、
//! 令牌获取、ISRC 定位、MusixMatch 组合请求、众包翻译获取、
//! 缓存写入，最后按当前设置渲染。按曲目 ID 的解析跳过提取与
//! ISRC 定位，其余步骤相同。
//!
//! "没有找到歌词"不是错误：上游没有结果、响应缺字段、没有同步
//! 歌词时都返回 `Ok(None)` 并记录日志，只有网络故障、令牌申请
//! 失败这类中断整条链的问题才返回 `Err`。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    cache::{CacheKey, ResolutionCache, TranslationCache},
    error::Result,
    extract::extract_original_track,
    model::{RawResolution, RenderedLyrics, SearchQuery},
    providers::{
        LyricsCatalog, MacroResponse, SongCatalog, Translator, Transliterator, build_http_client,
        musixmatch::MusixmatchCatalog, mymemory::MyMemoryTranslator, shazam::ShazamCatalog,
    },
    render::Renderer,
    settings::{SettingsProvider, SettingsSnapshot},
    token::CredentialManager,
};

/// 解析器依赖的全部协作方，用于注入自定义实现。
pub struct Collaborators {
    pub settings: Arc<dyn SettingsProvider>,
    pub lyrics_catalog: Arc<dyn LyricsCatalog>,
    pub song_catalog: Arc<dyn SongCatalog>,
    pub translator: Arc<dyn Translator>,
    /// 可选的注音实现。缺省时跳过注音渲染。
    pub transliterator: Option<Arc<dyn Transliterator>>,
}

/// 同步歌词解析器。
///
/// 持有解析缓存与翻译缓存，整个进程共享一个实例即可。
pub struct LyricsResolver {
    settings: Arc<dyn SettingsProvider>,
    lyrics_catalog: Arc<dyn LyricsCatalog>,
    song_catalog: Arc<dyn SongCatalog>,
    credentials: CredentialManager,
    cache: ResolutionCache,
    renderer: Renderer,
}

impl LyricsResolver {
    /// 用默认的外部服务客户端创建解析器。
    ///
    /// MusixMatch、Shazam 与 MyMemory 共享同一个 HTTP 客户端；
    /// 注音实现默认缺省，可通过 [`Self::with_collaborators`] 注入。
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Result<Self> {
        let http = build_http_client()?;
        Ok(Self::with_collaborators(Collaborators {
            settings,
            lyrics_catalog: Arc::new(MusixmatchCatalog::new(http.clone())),
            song_catalog: Arc::new(ShazamCatalog::new(http.clone())),
            translator: Arc::new(MyMemoryTranslator::new(http)),
            transliterator: None,
        }))
    }

    /// 用注入的协作方创建解析器。
    #[must_use]
    pub fn with_collaborators(collaborators: Collaborators) -> Self {
        let credentials = CredentialManager::new(
            Arc::clone(&collaborators.settings),
            Arc::clone(&collaborators.lyrics_catalog),
        );
        let renderer = Renderer::new(
            TranslationCache::new(collaborators.translator),
            collaborators.transliterator,
        );
        Self {
            settings: collaborators.settings,
            lyrics_catalog: collaborators.lyrics_catalog,
            song_catalog: collaborators.song_catalog,
            credentials,
            cache: ResolutionCache::new(),
            renderer,
        }
    }

    /// 按标题与艺术家解析同步歌词。
    ///
    /// 上游只有一页结果，`page` 大于 1 时直接返回 `Ok(None)`，
    /// 不发起任何网络请求。
    #[instrument(skip(self))]
    pub async fn resolve_by_query(&self, query: &SearchQuery) -> Result<Option<RenderedLyrics>> {
        if query.page.is_some_and(|page| page > 1) {
            return Ok(None);
        }

        let settings = SettingsSnapshot::capture(self.settings.as_ref());

        let (search_title, search_artist) = if settings.extract_original_track {
            let extracted = extract_original_track(&query.title, &query.artist);
            if extracted.title != query.title || extracted.artist != query.artist {
                info!(
                    original_title = %query.title,
                    original_artist = %query.artist,
                    title = %extracted.title,
                    artist = %extracted.artist,
                    "已从翻唱标题中提取原曲信息"
                );
            }
            (extracted.title, extracted.artist)
        } else {
            (query.title.clone(), query.artist.clone())
        };

        let key = CacheKey::Query {
            page: query.page,
            title: search_title.clone(),
            artist: search_artist.clone(),
        };
        if let Some(cached) = self.cache.get(&key) {
            info!("命中解析缓存，按当前设置重新渲染");
            return Ok(Some(self.renderer.render(&cached, &settings).await));
        }

        let token = self.credentials.token().await?;

        let term = search_term(&search_title, &search_artist);
        let Some(isrc) = self.song_catalog.find_isrc(&term).await? else {
            warn!(title = %search_title, artist = %search_artist, "没有找到对应的 ISRC");
            return Ok(None);
        };

        info!(isrc, "正在获取歌词");
        let envelope = self.lyrics_catalog.macro_by_isrc(&isrc, &token).await?;
        self.finish_resolution(key, &envelope, &token, &settings)
            .await
    }

    /// 按已知的 MusixMatch 曲目 ID 解析同步歌词。
    #[instrument(skip(self))]
    pub async fn resolve_by_id(&self, track_id: u64) -> Result<Option<RenderedLyrics>> {
        let settings = SettingsSnapshot::capture(self.settings.as_ref());

        let key = CacheKey::Track(track_id);
        if let Some(cached) = self.cache.get(&key) {
            info!("命中解析缓存，按当前设置重新渲染");
            return Ok(Some(self.renderer.render(&cached, &settings).await));
        }

        let token = self.credentials.token().await?;

        info!(track_id, "正在按曲目 ID 获取歌词");
        let envelope = self
            .lyrics_catalog
            .macro_by_track_id(track_id, &token)
            .await?;
        self.finish_resolution(key, &envelope, &token, &settings)
            .await
    }

    /// 按查询搜索同步歌词，把结果整理成列表。
    ///
    /// 专为"返回候选列表"形态的宿主接口准备：解析出错或没有
    /// 结果都返回空列表，错误只记录日志，不向调用方传播。
    pub async fn search_lyrics(&self, query: &SearchQuery) -> Vec<RenderedLyrics> {
        match self.resolve_by_query(query).await {
            Ok(Some(rendered)) => vec![rendered],
            Ok(None) => {
                warn!(?query, "没有找到同步歌词");
                Vec::new()
            }
            Err(err) => {
                warn!(?query, "解析歌词失败: {err}");
                Vec::new()
            }
        }
    }

    /// 查询与按 ID 两条路径共用的收尾：校验响应、获取翻译、
    /// 写入缓存并渲染。
    async fn finish_resolution(
        &self,
        key: CacheKey,
        envelope: &MacroResponse,
        token: &str,
        settings: &SettingsSnapshot,
    ) -> Result<Option<RenderedLyrics>> {
        if !envelope.lyrics_call_succeeded() {
            warn!("MusixMatch 未返回可用的歌词");
            return Ok(None);
        }
        let Some(record) = envelope.to_track_record() else {
            warn!("MusixMatch 响应缺少必要的曲目字段");
            return Ok(None);
        };
        let Some(synced_lyrics) = record.synced_lyrics.clone() else {
            info!(track_id = record.id, "该曲目没有同步歌词");
            return Ok(None);
        };
        info!(track_id = record.id, "找到同步歌词");

        let source_is_japanese = envelope.subtitle_language() == Some("ja");

        let translation_candidates = match self
            .lyrics_catalog
            .translation_candidates(record.id, token, &settings.language)
            .await
        {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("获取众包翻译失败: {err}");
                Vec::new()
            }
        };

        let resolution = Arc::new(RawResolution {
            record,
            synced_lyrics_text: synced_lyrics,
            translation_candidates,
            source_is_japanese,
        });
        self.cache.insert(key, Arc::clone(&resolution));

        Ok(Some(self.renderer.render(&resolution, settings).await))
    }
}

/// 拼出 ISRC 搜索的关键词：艺术家在前、标题在后，空白的部分
/// 跳过；两者都空白时退回修剪过的标题。
fn search_term(title: &str, artist: &str) -> String {
    let joined = [artist, title]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let term = joined.trim();
    if term.is_empty() {
        title.trim().to_owned()
    } else {
        term.to_owned()
    }
}
