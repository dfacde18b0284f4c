//! 行级 LRC 文本与时间轴映射之间的解码。
//!
//! 每行形如 `[mm:ss.xx] 歌词内容`，以首个 `"] "` 为界切分时间标签
//! 与内容。时间戳换算为毫秒偏移，作为 [`LyricMap`] 的键；同一偏移
//! 出现多次时，后出现的行覆盖先出现的行。无法解析的行直接跳过。

use crate::model::LyricMap;

/// 把整段同步歌词文本解码为毫秒偏移到歌词行的映射。
///
/// 返回的映射按偏移升序排列，每个偏移初始只有一个文本变体，
/// 后续的翻译与注音会追加到对应的变体列表末尾。
pub fn parse_synced_lyrics(text: &str) -> LyricMap {
    let mut map = LyricMap::new();
    for line in text.lines() {
        let Some((tag, content)) = line.split_once("] ") else {
            continue;
        };
        let Some(offset) = parse_offset(tag) else {
            continue;
        };
        map.insert(offset, vec![content.to_owned()]);
    }
    map
}

/// 把 `[mm:ss.xx` 形式的时间标签解析为毫秒偏移。
///
/// 秒可以带小数，结果四舍五入到毫秒。分秒任意一段无法解析、
/// 秒为负数或非有限值、或换算结果超出 `u64` 毫秒范围时返回 `None`。
fn parse_offset(tag: &str) -> Option<u64> {
    let tag = tag.trim().strip_prefix('[')?;
    let (minutes, seconds) = tag.split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    // 大于等于 2^64 的浮点数转 u64 会饱和为 u64::MAX，须先拒绝。
    if millis >= u64::MAX as f64 {
        return None;
    }
    minutes.checked_mul(60_000)?.checked_add(millis as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_fractional_seconds() {
        let map = parse_synced_lyrics("[00:01.50] Hello\n[01:02.345] World");

        assert_eq!(map.get(&1500), Some(&vec!["Hello".to_string()]));
        assert_eq!(map.get(&62345), Some(&vec!["World".to_string()]));
    }

    #[test]
    fn later_line_overwrites_same_offset() {
        let map = parse_synced_lyrics("[00:01.50] Hello\n[00:01.50] World");

        assert_eq!(map.len(), 1, "同一时间戳只应保留一行");
        assert_eq!(map.get(&1500), Some(&vec!["World".to_string()]));
    }

    #[test]
    fn splits_on_first_separator_only() {
        let map = parse_synced_lyrics("[00:10.00] 左手 ] 右手");

        assert_eq!(map.get(&10_000), Some(&vec!["左手 ] 右手".to_string()]));
    }

    #[test]
    fn skips_unparsable_lines() {
        let text = "没有时间标签\n[ar:某人]\n[xx:yy] 坏时间\n[00:05.00] 有效行\n[00:-3.00] 负秒";
        let map = parse_synced_lyrics(text);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&5000), Some(&vec!["有效行".to_string()]));
    }

    #[test]
    fn offsets_iterate_in_ascending_order() {
        let map = parse_synced_lyrics("[01:00.00] 后\n[00:30.00] 中\n[00:01.00] 前");
        let offsets: Vec<u64> = map.keys().copied().collect();

        assert_eq!(offsets, vec![1000, 30_000, 60_000]);
    }

    #[test]
    fn empty_text_yields_empty_map() {
        assert!(parse_synced_lyrics("").is_empty());
    }

    #[test]
    fn rounds_seconds_to_nearest_millisecond() {
        let map = parse_synced_lyrics("[00:01.0006] 行");

        assert_eq!(map.keys().next(), Some(&1001));
    }

    #[test]
    fn overflowing_minutes_are_skipped() {
        let map = parse_synced_lyrics("[18446744073709551615:00] 行");

        assert!(map.is_empty(), "分钟溢出的行应按无法解析处理");
    }

    #[test]
    fn overflowing_seconds_are_skipped() {
        let map = parse_synced_lyrics("[1:1e300] 行");

        assert!(map.is_empty(), "秒数超出毫秒范围的行应按无法解析处理");
    }
}
