//! 把缓存的原始解析结果按当前设置渲染成最终歌词。
//!
//! 渲染每次都从原始同步歌词文本重新解码，不修改缓存的数据，
//! 所以设置变化后直接重新渲染即可生效，无需重新请求上游。
//!
//! 每个时间偏移的变体列表按固定优先级追加：原文、韩文注音、
//! 上游众包翻译、机器翻译兜底。已存在的完全相同的文本不会
//! 重复追加。

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    cache::TranslationCache,
    lrc::parse_synced_lyrics,
    model::{RawResolution, RenderedLyrics},
    providers::Transliterator,
    settings::SettingsSnapshot,
};

/// 结果渲染器。持有翻译缓存与可选的注音实现。
pub struct Renderer {
    translation_cache: TranslationCache,
    transliterator: Option<Arc<dyn Transliterator>>,
}

impl Renderer {
    #[must_use]
    pub const fn new(
        translation_cache: TranslationCache,
        transliterator: Option<Arc<dyn Transliterator>>,
    ) -> Self {
        Self {
            translation_cache,
            transliterator,
        }
    }

    /// 按设置快照渲染一份解析结果。
    ///
    /// 注音与机器翻译兜底只在目标语言为 `"ko"` 且源歌词是日语时
    /// 生效；上游众包翻译始终应用。任何一步失败只影响对应的行，
    /// 渲染本身不会失败。
    pub async fn render(
        &self,
        resolution: &RawResolution,
        settings: &SettingsSnapshot,
    ) -> RenderedLyrics {
        let mut lyric = parse_synced_lyrics(&resolution.synced_lyrics_text);
        let target_is_korean = settings.language == "ko";

        if target_is_korean
            && settings.show_phonetic_annotation
            && resolution.source_is_japanese
            && let Some(transliterator) = &self.transliterator
        {
            for lines in lyric.values_mut() {
                let Some(original) = lines.first().filter(|line| !line.is_empty()).cloned() else {
                    continue;
                };
                match transliterator.transliterate(&original) {
                    Ok(phonetic) => {
                        if !phonetic.is_empty() && !lines.contains(&phonetic) {
                            lines.push(phonetic);
                        }
                    }
                    Err(err) => warn!("生成韩文注音失败: {err}"),
                }
            }
        }

        for candidate in &resolution.translation_candidates {
            for lines in lyric.values_mut() {
                if lines.contains(&candidate.source_line)
                    && !lines.contains(&candidate.target_text)
                {
                    lines.push(candidate.target_text.clone());
                }
            }
        }

        if target_is_korean && settings.use_fallback_translation && resolution.source_is_japanese {
            info!("正在为没有翻译的行应用机器翻译兜底...");
            for lines in lyric.values_mut() {
                let Some(original) = lines.first().filter(|line| !line.is_empty()).cloned() else {
                    continue;
                };
                // 最多两个变体说明还没有任何翻译（只有原文或原文加注音）
                if lines.len() > 2 {
                    continue;
                }
                if let Some(translated) = self
                    .translation_cache
                    .translate(&original, "ja", &settings.language)
                    .await
                    && !lines.contains(&translated)
                {
                    lines.push(translated);
                }
            }
        }

        RenderedLyrics {
            id: resolution.record.id.to_string(),
            title: resolution.record.track_name.clone(),
            album: resolution.record.album_name.clone(),
            artist: resolution.record.artist_name.clone(),
            playtime: resolution.record.duration_secs.saturating_mul(1000),
            lyric,
            lyric_raw: resolution.synced_lyrics_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        error::{LyricsError, Result},
        model::{RawTrackRecord, TranslationCandidate},
        providers::Translator,
    };

    struct SuffixTranslator;

    #[async_trait]
    impl Translator for SuffixTranslator {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<Option<String>> {
            Ok(Some(format!("{text}-번역")))
        }
    }

    struct SuffixTransliterator;

    impl Transliterator for SuffixTransliterator {
        fn transliterate(&self, text: &str) -> Result<String> {
            Ok(format!("{text}-음"))
        }
    }

    /// 对含有"噛"的行报错，其余行正常注音。
    struct PartialTransliterator;

    impl Transliterator for PartialTransliterator {
        fn transliterate(&self, text: &str) -> Result<String> {
            if text.contains('噛') {
                return Err(LyricsError::Internal("未收录的读音".to_string()));
            }
            Ok(format!("{text}-음"))
        }
    }

    fn renderer(transliterator: Option<Arc<dyn Transliterator>>) -> Renderer {
        Renderer::new(
            TranslationCache::new(Arc::new(SuffixTranslator)),
            transliterator,
        )
    }

    fn resolution(
        synced: &str,
        candidates: Vec<TranslationCandidate>,
        source_is_japanese: bool,
    ) -> RawResolution {
        RawResolution {
            record: RawTrackRecord {
                id: 99,
                track_name: "曲名".to_string(),
                artist_name: "歌手".to_string(),
                album_name: "专辑".to_string(),
                duration_secs: 245,
                instrumental: false,
                plain_lyrics: synced.to_string(),
                synced_lyrics: Some(synced.to_string()),
            },
            synced_lyrics_text: synced.to_string(),
            translation_candidates: candidates,
            source_is_japanese,
        }
    }

    fn snapshot(language: &str, phonetic: bool, fallback: bool) -> SettingsSnapshot {
        SettingsSnapshot {
            language: language.to_string(),
            show_phonetic_annotation: phonetic,
            extract_original_track: true,
            use_fallback_translation: fallback,
        }
    }

    #[tokio::test]
    async fn phonetic_annotation_is_appended_per_line() {
        let renderer = renderer(Some(Arc::new(SuffixTransliterator)));
        let resolution = resolution("[00:01.00] 夜\n[00:02.00] 光", Vec::new(), true);

        let rendered = renderer
            .render(&resolution, &snapshot("ko", true, false))
            .await;

        assert_eq!(
            rendered.lyric.get(&1000),
            Some(&vec!["夜".to_string(), "夜-음".to_string()])
        );
        assert_eq!(
            rendered.lyric.get(&2000),
            Some(&vec!["光".to_string(), "光-음".to_string()])
        );
    }

    #[tokio::test]
    async fn phonetic_annotation_requires_korean_target_and_japanese_source() {
        let renderer = renderer(Some(Arc::new(SuffixTransliterator)));

        let non_korean = renderer
            .render(
                &resolution("[00:01.00] 夜", Vec::new(), true),
                &snapshot("en", true, false),
            )
            .await;
        assert_eq!(non_korean.lyric.get(&1000), Some(&vec!["夜".to_string()]));

        let non_japanese = renderer
            .render(
                &resolution("[00:01.00] night", Vec::new(), false),
                &snapshot("ko", true, false),
            )
            .await;
        assert_eq!(
            non_japanese.lyric.get(&1000),
            Some(&vec!["night".to_string()])
        );
    }

    #[tokio::test]
    async fn transliteration_failure_only_skips_that_line() {
        let renderer = renderer(Some(Arc::new(PartialTransliterator)));
        let resolution = resolution("[00:01.00] 夜\n[00:02.00] 噛む", Vec::new(), true);

        let rendered = renderer
            .render(&resolution, &snapshot("ko", true, false))
            .await;

        assert_eq!(
            rendered.lyric.get(&1000),
            Some(&vec!["夜".to_string(), "夜-음".to_string()]),
            "其余行应照常注音"
        );
        assert_eq!(rendered.lyric.get(&2000), Some(&vec!["噛む".to_string()]));
    }

    #[tokio::test]
    async fn upstream_translation_matches_any_variant_without_duplicates() {
        let renderer = renderer(None);
        let candidates = vec![
            TranslationCandidate {
                source_line: "夜".to_string(),
                target_text: "밤".to_string(),
            },
            // 与上一条完全相同，不应二次追加
            TranslationCandidate {
                source_line: "夜".to_string(),
                target_text: "밤".to_string(),
            },
            TranslationCandidate {
                source_line: "不存在的行".to_string(),
                target_text: "不应出现".to_string(),
            },
        ];
        let resolution = resolution("[00:01.00] 夜", candidates, true);

        let rendered = renderer
            .render(&resolution, &snapshot("ko", false, false))
            .await;

        assert_eq!(
            rendered.lyric.get(&1000),
            Some(&vec!["夜".to_string(), "밤".to_string()])
        );
    }

    #[tokio::test]
    async fn upstream_translation_is_not_gated_by_language() {
        let renderer = renderer(None);
        let candidates = vec![TranslationCandidate {
            source_line: "night".to_string(),
            target_text: "Nacht".to_string(),
        }];
        let resolution = resolution("[00:01.00] night", candidates, false);

        let rendered = renderer
            .render(&resolution, &snapshot("de", true, true))
            .await;

        assert_eq!(
            rendered.lyric.get(&1000),
            Some(&vec!["night".to_string(), "Nacht".to_string()])
        );
    }

    #[tokio::test]
    async fn fallback_translation_fills_only_untranslated_lines() {
        let renderer = renderer(Some(Arc::new(SuffixTransliterator)));
        let candidates = vec![TranslationCandidate {
            source_line: "夜".to_string(),
            target_text: "밤".to_string(),
        }];
        let resolution = resolution("[00:01.00] 夜\n[00:02.00] 光", candidates, true);

        let rendered = renderer
            .render(&resolution, &snapshot("ko", true, true))
            .await;

        assert_eq!(
            rendered.lyric.get(&1000),
            Some(&vec![
                "夜".to_string(),
                "夜-음".to_string(),
                "밤".to_string()
            ]),
            "已有上游翻译的行不应再机器翻译"
        );
        assert_eq!(
            rendered.lyric.get(&2000),
            Some(&vec![
                "光".to_string(),
                "光-음".to_string(),
                "光-번역".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn fallback_translation_respects_gates() {
        let renderer = renderer(None);
        let resolution = resolution("[00:01.00] 夜", Vec::new(), true);

        let disabled = renderer
            .render(&resolution, &snapshot("ko", false, false))
            .await;
        assert_eq!(disabled.lyric.get(&1000), Some(&vec!["夜".to_string()]));

        let wrong_language = renderer
            .render(&resolution, &snapshot("en", false, true))
            .await;
        assert_eq!(
            wrong_language.lyric.get(&1000),
            Some(&vec!["夜".to_string()])
        );
    }

    #[tokio::test]
    async fn metadata_is_copied_from_record() {
        let renderer = renderer(None);
        let resolution = resolution("[00:01.00] 夜", Vec::new(), false);

        let rendered = renderer
            .render(&resolution, &snapshot("ko", false, false))
            .await;

        assert_eq!(rendered.id, "99");
        assert_eq!(rendered.title, "曲名");
        assert_eq!(rendered.album, "专辑");
        assert_eq!(rendered.artist, "歌手");
        assert_eq!(rendered.playtime, 245_000);
        assert_eq!(rendered.lyric_raw, "[00:01.00] 夜");
    }

    #[tokio::test]
    async fn oversized_duration_saturates_playtime() {
        let renderer = renderer(None);
        let mut resolution = resolution("[00:01.00] 夜", Vec::new(), false);
        resolution.record.duration_secs = u64::MAX;

        let rendered = renderer
            .render(&resolution, &snapshot("ko", false, false))
            .await;

        assert_eq!(rendered.playtime, u64::MAX, "异常时长应饱和而不是回绕");
    }

    #[tokio::test]
    async fn rendering_twice_with_the_same_settings_is_identical() {
        let renderer = renderer(Some(Arc::new(SuffixTransliterator)));
        let candidates = vec![TranslationCandidate {
            source_line: "夜".to_string(),
            target_text: "밤".to_string(),
        }];
        let resolution = resolution("[00:01.00] 夜\n[00:02.00] 光", candidates, true);
        let settings = snapshot("ko", true, true);

        let first = renderer.render(&resolution, &settings).await;
        let second = renderer.render(&resolution, &settings).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn rendering_never_mutates_the_cached_resolution() {
        let renderer = renderer(Some(Arc::new(SuffixTransliterator)));
        let resolution = resolution("[00:01.00] 夜", Vec::new(), true);

        let annotated = renderer
            .render(&resolution, &snapshot("ko", true, false))
            .await;
        assert_eq!(annotated.lyric.get(&1000).map(Vec::len), Some(2));

        let plain = renderer
            .render(&resolution, &snapshot("ko", false, false))
            .await;
        assert_eq!(
            plain.lyric.get(&1000).map(Vec::len),
            Some(1),
            "关闭注音后重新渲染不应保留上一次的注音"
        );
    }
}
