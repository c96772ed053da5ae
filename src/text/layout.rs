//! Greedy word wrap and block alignment.
//!
//! Both functions are pure: they take a measuring function or [`TextMeasure`]
//! and never look at pixels. Overflow is permitted everywhere: a word wider
//! than the box gets its own line, and a block taller or wider than the box
//! is positioned by the same formulas and may extend past its edges. There
//! is no shrink-to-fit.

use super::{HorizontalAlign, TextMeasure, VerticalAlign};

/// Nominal text box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// One line of text with its resolved top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Wrap `text` into lines no wider than `max_width` where possible.
///
/// Words are whitespace-separated and never split. A candidate line
/// `current + " " + word` is accepted while `measure(candidate) <= max_width`.
///
/// # Examples
/// ```
/// # use screenshot_cropper::text::wrap_text;
/// // 10px per character
/// let lines = wrap_text("one two three", 70, |s| s.chars().count() as u32 * 10);
/// assert_eq!(lines, vec!["one two", "three"]);
/// ```
pub fn wrap_text(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lines to draw for a caption.
///
/// Explicit line breaks always start a new line. Each resulting line is kept
/// verbatim when it fits `max_width` and greedily wrapped otherwise.
pub fn break_lines(text: &str, max_width: u32, measure: &impl TextMeasure) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.trim_matches(|c: char| c == '\n' || c == '\r').lines() {
        if measure.text_width(paragraph) <= max_width {
            lines.push(paragraph.to_string());
            continue;
        }
        let wrapped = wrap_text(paragraph, max_width, |s| measure.text_width(s));
        for line in &wrapped {
            if !line.contains(' ') && measure.text_width(line) > max_width {
                tracing::warn!(word = %line, max_width, "word is wider than the text box");
            }
        }
        lines.extend(wrapped);
    }
    lines
}

/// Gap between consecutive lines: `floor(font_size * 0.2)`.
pub fn line_spacing(font_size: u32) -> u32 {
    font_size / 5
}

/// Resolve the origin of every line inside `bounds`.
///
/// Lines stack top to bottom in order. The block height is the sum of line
/// heights plus one spacing between each pair of lines.
pub fn layout_lines(
    lines: &[String],
    measure: &impl TextMeasure,
    bounds: TextBox,
    align: HorizontalAlign,
    vertical_align: VerticalAlign,
    font_size: u32,
) -> Vec<PlacedLine> {
    if lines.is_empty() {
        return Vec::new();
    }

    let spacing = line_spacing(font_size) as i64;
    let heights: Vec<u32> = lines.iter().map(|l| measure.text_height(l)).collect();
    let total_height =
        heights.iter().map(|&h| h as i64).sum::<i64>() + spacing * (lines.len() as i64 - 1);

    let box_height = bounds.height as i64;
    let mut y = match vertical_align {
        VerticalAlign::Top => bounds.y,
        VerticalAlign::Middle => bounds.y + (box_height - total_height).div_euclid(2),
        VerticalAlign::Bottom => bounds.y + box_height - total_height,
    };

    let box_width = bounds.width as i64;
    let mut placed = Vec::with_capacity(lines.len());
    for (line, height) in lines.iter().zip(heights) {
        let width = measure.text_width(line);
        let x = match align {
            HorizontalAlign::Left => bounds.x,
            HorizontalAlign::Center => bounds.x + (box_width - width as i64).div_euclid(2),
            HorizontalAlign::Right => bounds.x + box_width - width as i64,
        };
        placed.push(PlacedLine {
            text: line.clone(),
            x,
            y,
            width,
            height,
        });
        y += height as i64 + spacing;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is `advance` wide; every line is `height` tall.
    struct Monospace {
        advance: u32,
        height: u32,
    }

    impl TextMeasure for Monospace {
        fn text_width(&self, text: &str) -> u32 {
            text.chars().count() as u32 * self.advance
        }

        fn text_height(&self, _text: &str) -> u32 {
            self.height
        }
    }

    /// Reports a fixed width regardless of content.
    struct Fixed {
        width: u32,
        height: u32,
    }

    impl TextMeasure for Fixed {
        fn text_width(&self, _text: &str) -> u32 {
            self.width
        }

        fn text_height(&self, _text: &str) -> u32 {
            self.height
        }
    }

    fn chars10(s: &str) -> u32 {
        s.chars().count() as u32 * 10
    }

    const SAMPLE: &str = "The quick brown fox jumps over the lazy dog while localized captions wrap";

    // =========================================================================
    // wrap_text
    // =========================================================================

    #[test]
    fn wrap_empty_input_is_empty() {
        assert!(wrap_text("", 100, chars10).is_empty());
        assert!(wrap_text("   \n\t ", 100, chars10).is_empty());
    }

    #[test]
    fn wrap_greedy_fills_lines() {
        let lines = wrap_text("aa bb cc dd", 50, chars10);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn wrap_boundary_is_inclusive() {
        // "aa bb" is exactly 50
        assert_eq!(wrap_text("aa bb", 50, chars10), vec!["aa bb"]);
        assert_eq!(wrap_text("aa bb", 49, chars10), vec!["aa", "bb"]);
    }

    #[test]
    fn wrap_long_word_gets_its_own_line() {
        let lines = wrap_text("a supercalifragilistic b", 50, chars10);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wrap_collapses_whitespace_runs() {
        let lines = wrap_text("one\n two\t\tthree", 1000, chars10);
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn wrap_never_alters_words() {
        let original: Vec<&str> = SAMPLE.split_whitespace().collect();
        for max_width in [0, 10, 35, 80, 150, 400, 10_000] {
            let lines = wrap_text(SAMPLE, max_width, chars10);
            let rejoined: Vec<String> = lines
                .iter()
                .flat_map(|l| l.split_whitespace().map(str::to_string))
                .collect();
            assert_eq!(rejoined, original, "max_width={max_width}");
        }
    }

    #[test]
    fn wrap_line_count_monotonic_in_width() {
        let mut previous = usize::MAX;
        for max_width in (0..=800).step_by(10) {
            let count = wrap_text(SAMPLE, max_width, chars10).len();
            assert!(
                count <= previous,
                "width {max_width} produced {count} lines, more than {previous}"
            );
            previous = count;
        }
    }

    // =========================================================================
    // break_lines
    // =========================================================================

    #[test]
    fn break_lines_keeps_fitting_text_verbatim() {
        let measure = Monospace {
            advance: 10,
            height: 20,
        };
        let lines = break_lines("Hello  World", 300, &measure);
        assert_eq!(lines, vec!["Hello  World"]);
    }

    #[test]
    fn break_lines_wraps_overflowing_text() {
        let measure = Monospace {
            advance: 10,
            height: 20,
        };
        let lines = break_lines("Hello brave new World", 120, &measure);
        assert_eq!(lines, vec!["Hello brave", "new World"]);
    }

    #[test]
    fn break_lines_splits_on_newlines_first() {
        let measure = Monospace {
            advance: 10,
            height: 20,
        };
        assert_eq!(break_lines("Hi\nYo", 300, &measure), vec!["Hi", "Yo"]);
        assert_eq!(
            break_lines("\r\nHello\r\nbrave new World\n", 120, &measure),
            vec!["Hello", "brave new", "World"]
        );
    }

    #[test]
    fn break_lines_keeps_inner_blank_lines() {
        let measure = Monospace {
            advance: 10,
            height: 20,
        };
        assert_eq!(break_lines("Top\n\nBottom", 300, &measure), vec!["Top", "", "Bottom"]);
    }

    #[test]
    fn break_lines_blank_text_draws_nothing() {
        let measure = Monospace {
            advance: 10,
            height: 20,
        };
        assert!(break_lines("  ", 120, &measure).is_empty());
    }

    // =========================================================================
    // layout_lines
    // =========================================================================

    fn bounds() -> TextBox {
        TextBox {
            x: 10,
            y: 10,
            width: 200,
            height: 100,
        }
    }

    fn one_line() -> Vec<String> {
        vec!["line".to_string()]
    }

    #[test]
    fn line_spacing_is_a_fifth_of_font_size() {
        assert_eq!(line_spacing(24), 4);
        assert_eq!(line_spacing(40), 8);
        assert_eq!(line_spacing(4), 0);
    }

    #[test]
    fn center_and_bottom_anchor() {
        let measure = Fixed {
            width: 50,
            height: 20,
        };
        let placed = layout_lines(
            &one_line(),
            &measure,
            bounds(),
            HorizontalAlign::Center,
            VerticalAlign::Bottom,
            20,
        );
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].x, 85);
        assert_eq!(placed[0].y, 90);
    }

    #[test]
    fn left_top_anchor_is_box_origin() {
        let measure = Fixed {
            width: 50,
            height: 20,
        };
        let placed = layout_lines(
            &one_line(),
            &measure,
            bounds(),
            HorizontalAlign::Left,
            VerticalAlign::Top,
            20,
        );
        assert_eq!((placed[0].x, placed[0].y), (10, 10));
    }

    #[test]
    fn right_middle_anchor() {
        let measure = Fixed {
            width: 50,
            height: 20,
        };
        let placed = layout_lines(
            &one_line(),
            &measure,
            bounds(),
            HorizontalAlign::Right,
            VerticalAlign::Middle,
            20,
        );
        assert_eq!(placed[0].x, 10 + 200 - 50);
        assert_eq!(placed[0].y, 10 + (100 - 20) / 2);
    }

    #[test]
    fn multi_line_block_includes_spacing() {
        let measure = Fixed {
            width: 50,
            height: 20,
        };
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        // font 40 → spacing 8; total = 3*20 + 2*8 = 76
        let placed = layout_lines(
            &lines,
            &measure,
            bounds(),
            HorizontalAlign::Left,
            VerticalAlign::Bottom,
            40,
        );
        let ys: Vec<i64> = placed.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![34, 62, 90]);
    }

    #[test]
    fn middle_floors_negative_offsets() {
        // Block of 101px in a 100px box: (100 - 101) floors to -1
        let measure = Fixed {
            width: 50,
            height: 101,
        };
        let placed = layout_lines(
            &one_line(),
            &measure,
            bounds(),
            HorizontalAlign::Left,
            VerticalAlign::Middle,
            20,
        );
        assert_eq!(placed[0].y, 9);
    }

    #[test]
    fn overflowing_line_is_not_clamped() {
        let measure = Fixed {
            width: 260,
            height: 20,
        };
        let placed = layout_lines(
            &one_line(),
            &measure,
            bounds(),
            HorizontalAlign::Center,
            VerticalAlign::Top,
            20,
        );
        assert_eq!(placed[0].x, 10 - 30);
    }

    #[test]
    fn caption_scenario_centered_single_line() {
        let measure = Fixed {
            width: 220,
            height: 30,
        };
        let box_ = TextBox {
            x: 50,
            y: 50,
            width: 300,
            height: 100,
        };
        let lines = break_lines("Hello World", box_.width, &measure);
        let placed = layout_lines(
            &lines,
            &measure,
            box_,
            HorizontalAlign::Center,
            VerticalAlign::Top,
            30,
        );
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "Hello World");
        assert_eq!((placed[0].x, placed[0].y), (90, 50));
    }

    #[test]
    fn empty_lines_layout_to_nothing() {
        let measure = Fixed {
            width: 1,
            height: 1,
        };
        let placed = layout_lines(
            &[],
            &measure,
            bounds(),
            HorizontalAlign::Left,
            VerticalAlign::Top,
            20,
        );
        assert!(placed.is_empty());
    }
}
