//! 解析结果与机器翻译的进程级缓存。

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::warn;

use crate::{model::RawResolution, providers::Translator};

/// 主缓存的键。
///
/// 按查询缓存时三个字段独立参与比较，避免把页码、标题、艺术家
/// 拼接成一个字符串后无法区分边界的键冲突。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// 按曲目 ID 解析。
    Track(u64),
    /// 按标题与艺术家搜索解析。
    Query {
        page: Option<u32>,
        title: String,
        artist: String,
    },
}

/// 原始解析结果的缓存。
///
/// 无容量上限，进程存活期间不失效：同一个键在上游视为不可变。
/// 缓存值不含任何用户设置，设置变化通过重新渲染体现。
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<CacheKey, Arc<RawResolution>>>,
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 查找缓存的解析结果。
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<RawResolution>> {
        self.entries.lock().get(key).cloned()
    }

    /// 写入解析结果。同键并发写入时后写的覆盖先写的，
    /// 两侧内容预期一致。
    pub fn insert(&self, key: CacheKey, resolution: Arc<RawResolution>) {
        self.entries.lock().insert(key, resolution);
    }
}

const TRANSLATION_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(500).unwrap();

/// 机器翻译结果的 LRU 缓存，包装具体的 [`Translator`] 实现。
///
/// 键是修剪过的原文。只缓存成功的翻译；失败或无结果不缓存，
/// 下次调用会重新请求。
pub struct TranslationCache {
    translator: Arc<dyn Translator>,
    entries: Mutex<LruCache<String, String>>,
}

impl TranslationCache {
    /// 用默认容量（500 条）创建缓存。
    #[must_use]
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self::with_capacity(translator, TRANSLATION_CACHE_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(translator: Arc<dyn Translator>, capacity: NonZeroUsize) -> Self {
        Self {
            translator,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// 翻译一行文本，优先命中缓存。
    ///
    /// 翻译接口出错时记录日志并返回 `None`，不向上传播。
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Option<String> {
        let key = text.trim();
        if key.is_empty() {
            return None;
        }

        if let Some(cached) = self.entries.lock().get(key) {
            return Some(cached.clone());
        }

        match self.translator.translate(key, source, target).await {
            Ok(Some(translated)) if !translated.is_empty() => {
                self.entries.lock().put(key.to_owned(), translated.clone());
                Some(translated)
            }
            Ok(_) => None,
            Err(err) => {
                warn!("翻译 API 调用失败: {err}");
                None
            }
        }
    }
}
