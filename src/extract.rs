//! 从"歌ってみた"类翻唱标题中提取原曲信息。
//!
//! 只处理以 `【歌ってみた】` 开头的标题，按固定规则依次剥离
//! 结尾的 `【...】` 块、` covered by X` 尾注和孤立的斜杠，然后：
//!
//! - `标题 / 右侧`：右侧视为翻唱者署名，丢弃，艺术家置空；
//! - `标题 - 右侧`：右侧视为原曲艺术家；
//! - 无分隔符：整体作为标题，艺术家置空。
//!
//! 不以该标记开头的输入会原样返回，纯文本处理，不做任何 I/O。

use std::sync::LazyLock;

use regex::Regex;

use crate::model::TrackIdentity;

/// 触发提取的标题前缀。
pub const COVER_MARKER: &str = "【歌ってみた】";

static TRAILING_BRACKET_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*【[^】]*】\s*$").expect("编译 TRAILING_BRACKET_BLOCK 失败")
});
static TRAILING_COVERED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+covered\s+by\s+.+$").expect("编译 TRAILING_COVERED_BY 失败")
});
static TRAILING_SLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[/／\u{2044}\u{2215}]\s*$").expect("编译 TRAILING_SLASH 失败")
});
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("编译 WHITESPACE_RUN 失败"));

/// 从带翻唱标记的标题中提取原曲的标题与艺术家。
///
/// # 参数
/// * `title` - 原始曲目标题。
/// * `artist` - 原始艺术家名。
///
/// # 返回
/// 提取出的 [`TrackIdentity`]。标题不以 [`COVER_MARKER`] 开头时
/// 原样返回输入；提取后标题为空时回退到修剪过的原始标题。
pub fn extract_original_track(title: &str, artist: &str) -> TrackIdentity {
    let raw = title.trim();
    let Some(stripped) = raw.strip_prefix(COVER_MARKER) else {
        return TrackIdentity {
            title: title.to_owned(),
            artist: artist.to_owned(),
        };
    };

    let cleaned = TRAILING_BRACKET_BLOCK.replace(stripped.trim(), "");
    let cleaned = TRAILING_COVERED_BY.replace(cleaned.trim(), "");
    let cleaned = TRAILING_SLASH.replace(cleaned.trim(), "");
    let cleaned = WHITESPACE_RUN.replace_all(cleaned.trim(), " ");
    let s = cleaned.trim();

    let (out_title, out_artist) = if let Some((left, _)) = s.split_once(" / ") {
        // 斜杠右侧是翻唱者署名，不是原曲艺术家
        (left.trim().to_owned(), String::new())
    } else if let Some((left, right)) = s.split_once(" - ") {
        let left = left.trim();
        let right = right.trim();
        if !left.is_empty() && !right.is_empty() {
            (left.to_owned(), right.to_owned())
        } else {
            let fallback = if left.is_empty() { s } else { left };
            (fallback.to_owned(), String::new())
        }
    } else {
        (s.to_owned(), String::new())
    };

    let out_title = if out_title.is_empty() {
        raw.to_owned()
    } else {
        out_title
    };

    TrackIdentity {
        title: out_title,
        artist: out_artist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(title: &str, artist: &str) -> TrackIdentity {
        TrackIdentity {
            title: title.to_owned(),
            artist: artist.to_owned(),
        }
    }

    #[test]
    fn slash_credit_clears_artist() {
        assert_eq!(
            extract_original_track("【歌ってみた】アイドル / 星街すいせい", ""),
            identity("アイドル", "")
        );
    }

    #[test]
    fn slash_credit_clears_artist_even_when_input_artist_present() {
        assert_eq!(
            extract_original_track("【歌ってみた】アイドル / 星街すいせい", "星街すいせい"),
            identity("アイドル", "")
        );
    }

    #[test]
    fn dash_keeps_original_artist() {
        assert_eq!(
            extract_original_track("【歌ってみた】残酷な天使のテーゼ - 高橋洋子", ""),
            identity("残酷な天使のテーゼ", "高橋洋子")
        );
    }

    #[test]
    fn trailing_bracket_block_is_removed() {
        assert_eq!(
            extract_original_track("【歌ってみた】シャルル【covered by 花宮莉歌】", "花宮莉歌"),
            identity("シャルル", "")
        );
        assert_eq!(
            extract_original_track(
                "【歌ってみた】シャルル【レイン・パターソン／にじさんじ】",
                ""
            ),
            identity("シャルル", "")
        );
    }

    #[test]
    fn trailing_covered_by_is_removed() {
        assert_eq!(
            extract_original_track("【歌ってみた】ヴァンパイア covered by 明透", "明透"),
            identity("ヴァンパイア", "")
        );
        assert_eq!(
            extract_original_track("【歌ってみた】夜に駆ける / covered by 幸祜&HACHI", ""),
            identity("夜に駆ける", "")
        );
    }

    #[test]
    fn trailing_orphan_slash_is_removed() {
        assert_eq!(
            extract_original_track("【歌ってみた】君の知らない物語 /", "supercell"),
            identity("君の知らない物語", "")
        );
        assert_eq!(
            extract_original_track("【歌ってみた】君の知らない物語 ／", ""),
            identity("君の知らない物語", "")
        );
    }

    #[test]
    fn ideographic_whitespace_is_collapsed() {
        assert_eq!(
            extract_original_track("【歌ってみた】ドーナツ　　ホール", ""),
            identity("ドーナツ ホール", "")
        );
    }

    #[test]
    fn without_marker_input_is_unchanged() {
        assert_eq!(
            extract_original_track("アイドル", "YOASOBI"),
            identity("アイドル", "YOASOBI")
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(extract_original_track("", ""), identity("", ""));
    }

    #[test]
    fn marker_only_title_falls_back_to_original() {
        assert_eq!(
            extract_original_track("【歌ってみた】", ""),
            identity("【歌ってみた】", "")
        );
    }
}
