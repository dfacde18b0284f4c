//! 基于 JSON 文件的设置持久化。
//!
//! 设置保存在系统配置目录下的 `musixmatch-lyrics/settings.json`。
//! 文件不存在时使用默认值，首次写入时自动创建。

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{LyricsError, Result},
    settings::{DEFAULT_TARGET_LANGUAGE, SettingsProvider},
};

const CONFIG_DIR_NAME: &str = "musixmatch-lyrics";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// 磁盘上的设置内容。缺失的字段按默认值补齐。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoredSettings {
    /// 目标翻译语言代码。
    pub language: String,
    /// 是否为日语歌词追加韩文发音标注。
    pub show_phonetic_annotation: bool,
    /// 是否从"歌ってみた"类标题中提取原曲信息。
    pub extract_original_track: bool,
    /// 上游没有翻译时是否用机器翻译兜底。
    pub use_fallback_translation: bool,
    /// 缓存的 MusixMatch 用户令牌。
    pub musixmatch_token: Option<String>,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_TARGET_LANGUAGE.to_owned(),
            show_phonetic_annotation: true,
            extract_original_track: true,
            use_fallback_translation: true,
            musixmatch_token: None,
        }
    }
}

/// 获取设置文件的完整路径，并确保所在目录存在。
fn settings_file_path() -> Result<PathBuf> {
    let Some(config_dir) = dirs::config_dir() else {
        return Err(LyricsError::Internal("无法确定系统配置目录".to_string()));
    };
    let app_dir = config_dir.join(CONFIG_DIR_NAME);
    fs::create_dir_all(&app_dir)?;
    Ok(app_dir.join(SETTINGS_FILE_NAME))
}

/// 把设置存放在 JSON 文件里的 [`SettingsProvider`] 实现。
///
/// 读取全部走内存副本；令牌更新时同步写回磁盘，写入失败
/// 只记录日志，不中断正在进行的解析。
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    state: RwLock<StoredSettings>,
}

impl JsonFileSettings {
    /// 从系统默认位置加载设置。
    pub fn load_default() -> Result<Self> {
        Self::load_from(settings_file_path()?)
    }

    /// 从指定路径加载设置。文件不存在时使用默认值。
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let state = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == ErrorKind::NotFound => StoredSettings::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// 当前使用的设置文件路径。
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &StoredSettings) {
        let serialized = match serde_json::to_string_pretty(state) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!("序列化设置失败: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            warn!("保存设置到 {:?} 失败: {err}", self.path);
        }
    }
}

impl SettingsProvider for JsonFileSettings {
    fn language(&self) -> String {
        self.state.read().language.clone()
    }

    fn show_phonetic_annotation(&self) -> bool {
        self.state.read().show_phonetic_annotation
    }

    fn extract_original_track(&self) -> bool {
        self.state.read().extract_original_track
    }

    fn use_fallback_translation(&self) -> bool {
        self.state.read().use_fallback_translation
    }

    fn persisted_token(&self) -> Option<String> {
        self.state.read().musixmatch_token.clone()
    }

    fn store_token(&self, token: &str) {
        let snapshot = {
            let mut state = self.state.write();
            state.musixmatch_token = Some(token.to_owned());
            state.clone()
        };
        self.persist(&snapshot);
    }
}
