//! 宿主设置的抽象与单次解析用的快照。

use parking_lot::RwLock;

/// 未设置目标语言时使用的默认语言代码。
pub const DEFAULT_TARGET_LANGUAGE: &str = "ko";

/// 宿主提供的设置接口。
///
/// 解析器只在每次请求开始时读取一次（见 [`SettingsSnapshot`]），
/// 令牌的读写则随用随取。
pub trait SettingsProvider: Send + Sync {
    /// 目标翻译语言代码。空字符串视为未设置。
    fn language(&self) -> String;

    /// 是否为日语歌词追加韩文发音标注。
    fn show_phonetic_annotation(&self) -> bool;

    /// 是否尝试从"歌ってみた"类标题中提取原曲信息。
    fn extract_original_track(&self) -> bool;

    /// 上游没有对应翻译时，是否用机器翻译兜底。
    fn use_fallback_translation(&self) -> bool;

    /// 之前持久化过的 MusixMatch 用户令牌。
    fn persisted_token(&self) -> Option<String>;

    /// 持久化新获取的用户令牌。
    fn store_token(&self, token: &str);
}

/// 一次解析请求开始时捕获的设置快照。
///
/// 请求进行中宿主修改设置不会影响已经开始的解析，
/// 下一次请求会重新捕获。
#[derive(Debug, Clone)]
pub struct SettingsSnapshot {
    /// 目标翻译语言，已应用默认值。
    pub language: String,
    pub show_phonetic_annotation: bool,
    pub extract_original_track: bool,
    pub use_fallback_translation: bool,
}

impl SettingsSnapshot {
    /// 读取当前设置并冻结为快照。语言为空时回退到
    /// [`DEFAULT_TARGET_LANGUAGE`]。
    #[must_use]
    pub fn capture(settings: &dyn SettingsProvider) -> Self {
        let language = settings.language();
        let language = if language.is_empty() {
            DEFAULT_TARGET_LANGUAGE.to_owned()
        } else {
            language
        };
        Self {
            language,
            show_phonetic_annotation: settings.show_phonetic_annotation(),
            extract_original_track: settings.extract_original_track(),
            use_fallback_translation: settings.use_fallback_translation(),
        }
    }
}

#[derive(Debug)]
struct MemorySettingsInner {
    language: String,
    show_phonetic_annotation: bool,
    extract_original_track: bool,
    use_fallback_translation: bool,
    token: Option<String>,
}

/// 保存在进程内存里的设置实现，适合测试和不需要持久化的宿主。
#[derive(Debug)]
pub struct MemorySettings {
    inner: RwLock<MemorySettingsInner>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            inner: RwLock::new(MemorySettingsInner {
                language: DEFAULT_TARGET_LANGUAGE.to_owned(),
                show_phonetic_annotation: true,
                extract_original_track: true,
                use_fallback_translation: true,
                token: None,
            }),
        }
    }
}

impl MemorySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_language(&self, language: impl Into<String>) {
        self.inner.write().language = language.into();
    }

    pub fn set_show_phonetic_annotation(&self, enabled: bool) {
        self.inner.write().show_phonetic_annotation = enabled;
    }

    pub fn set_extract_original_track(&self, enabled: bool) {
        self.inner.write().extract_original_track = enabled;
    }

    pub fn set_use_fallback_translation(&self, enabled: bool) {
        self.inner.write().use_fallback_translation = enabled;
    }

    /// 清除已保存的令牌，下一次解析会重新获取。
    pub fn clear_token(&self) {
        self.inner.write().token = None;
    }
}

impl SettingsProvider for MemorySettings {
    fn language(&self) -> String {
        self.inner.read().language.clone()
    }

    fn show_phonetic_annotation(&self) -> bool {
        self.inner.read().show_phonetic_annotation
    }

    fn extract_original_track(&self) -> bool {
        self.inner.read().extract_original_track
    }

    fn use_fallback_translation(&self) -> bool {
        self.inner.read().use_fallback_translation
    }

    fn persisted_token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    fn store_token(&self, token: &str) {
        self.inner.write().token = Some(token.to_owned());
    }
}
