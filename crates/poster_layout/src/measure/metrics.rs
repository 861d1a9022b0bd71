use super::{TextMeasurer, TextStyle};
use crate::geometry::Extent;

/// Advance widths of ASCII 0x20..=0x7E in em units, Arial-like proportions.
///
/// Index = `(char as usize) - 32`.
#[rustfmt::skip]
static ASCII_WIDTHS: [f32; 95] = [
    // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
    0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
    // 0      1      2      3      4      5      6      7      8      9
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
    // :      ;      <      =      >      ?      @
    0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
    // A      B      C      D      E      F      G      H      I      J      K      L      M
    0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
    // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
    0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
    // [      \      ]      ^      _      `
    0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
    // a      b      c      d      e      f      g      h      i      j      k      l      m
    0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
    // n      o      p      q      r      s      t      u      v      w      x      y      z
    0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
    // {      |      }      ~
    0.334, 0.260, 0.334, 0.584,
];

/// Width used for characters outside the table.
const AVERAGE_CHAR_WIDTH: f32 = 0.55;

/// Headless measurer approximating a browser block with `white-space: normal`
/// and `overflow-wrap: break-word`.
///
/// Widths come from a static table scaled by family and weight, lines wrap
/// greedily at the content width, and the box carries uniform padding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricMeasurer {
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Padding on each side of the box, in px.
    pub padding: f32,
}

impl Default for MetricMeasurer {
    fn default() -> Self {
        Self { line_height: 1.2, padding: 4.0 }
    }
}

impl MetricMeasurer {
    fn char_width(c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            ASCII_WIDTHS[code - 32]
        } else {
            AVERAGE_CHAR_WIDTH
        }
    }

    /// Widening factor of a font family relative to the regular cut.
    fn family_scale(family: &str) -> f32 {
        let primary = family.split(',').next().unwrap_or_default().to_ascii_lowercase();
        if primary.contains("black") {
            1.18
        } else if primary.contains("narrow") || primary.contains("condensed") {
            0.82
        } else if primary.contains("rounded") {
            1.04
        } else {
            1.0
        }
    }

    /// Heavier weights run wider; 400 is neutral.
    fn weight_scale(weight: u16) -> f32 {
        1.0 + (f32::from(weight.clamp(100, 900)) - 400.0) / 2000.0
    }

    /// Width of every laid-out line in px, after greedy wrapping at `limit`.
    fn line_widths(&self, text: &str, px_per_em: f32, limit: Option<f32>) -> Vec<f32> {
        let char_px = |c: char| Self::char_width(c) * px_per_em;
        let space = char_px(' ');
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current: Option<f32> = None;

            for word in paragraph.split_whitespace() {
                let word_width: f32 = word.chars().map(char_px).sum();

                let Some(limit) = limit else {
                    current = Some(current.map_or(word_width, |w| w + space + word_width));
                    continue;
                };

                if let Some(width) = current.take() {
                    if width + space + word_width <= limit {
                        current = Some(width + space + word_width);
                        continue;
                    }
                    lines.push(width);
                }

                if word_width <= limit {
                    current = Some(word_width);
                    continue;
                }

                // Break inside the word, keeping at least one character per line.
                let mut run = 0.0;
                for c in word.chars() {
                    let width = char_px(c);
                    if run > 0.0 && run + width > limit {
                        lines.push(run);
                        run = 0.0;
                    }
                    run += width;
                }
                current = Some(run);
            }

            lines.push(current.unwrap_or(0.0));
        }

        lines
    }
}

impl TextMeasurer for MetricMeasurer {
    fn measure(&self, text: &str, style: &TextStyle<'_>) -> Extent {
        let size = style.font_size as f32;
        let px_per_em = size * Self::family_scale(style.family) * Self::weight_scale(style.weight);
        let limit = style.max_width.map(|width| (width - 2.0 * self.padding).max(0.0));

        let lines = self.line_widths(text, px_per_em, limit);
        let longest = lines.iter().copied().fold(0.0_f32, f32::max);

        let mut width = longest + 2.0 * self.padding;
        if let Some(max_width) = style.max_width {
            width = width.min(max_width.max(2.0 * self.padding));
        }
        let height = lines.len() as f32 * self.line_height * size + 2.0 * self.padding;

        Extent::new(width, height).rotated(style.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation;

    fn style(font_size: u32, max_width: Option<f32>) -> TextStyle<'static> {
        TextStyle {
            family: "Arial, sans-serif",
            weight: 400,
            font_size,
            max_width,
            rotation: Rotation::Upright,
        }
    }

    #[test]
    fn single_line_width() {
        let measurer = MetricMeasurer::default();
        let extent = measurer.measure("II", &style(10, None));
        assert!((extent.width - (2.0 * 0.278 * 10.0 + 8.0)).abs() < 1e-4);
        assert!((extent.height - (12.0 + 8.0)).abs() < 1e-4);
    }

    #[test]
    fn wraps_at_max_width() {
        let measurer = MetricMeasurer::default();
        let unbounded = measurer.measure("summer sale today", &style(20, None));
        let wrapped = measurer.measure("summer sale today", &style(20, Some(90.0)));

        assert!(wrapped.width <= 90.0);
        assert!(wrapped.height > unbounded.height);
    }

    #[test]
    fn long_word_breaks_instead_of_overflowing() {
        let measurer = MetricMeasurer::default();
        let extent = measurer.measure("WWWWWWWWWWWW", &style(20, Some(60.0)));
        assert!(extent.width <= 60.0);
        assert!(extent.height > 3.0 * 24.0);
    }

    #[test]
    fn explicit_newlines_start_lines() {
        let measurer = MetricMeasurer::default();
        let extent = measurer.measure("a\n\nb", &style(10, None));
        assert!((extent.height - (3.0 * 12.0 + 8.0)).abs() < 1e-4);
    }

    #[test]
    fn weight_and_family_widen_text() {
        let measurer = MetricMeasurer::default();
        let regular = measurer.measure("POSTER", &style(30, None));
        let heavy = measurer.measure("POSTER", &TextStyle { weight: 900, ..style(30, None) });
        let black = measurer
            .measure("POSTER", &TextStyle { family: "Arial Black, sans-serif", ..style(30, None) });
        let narrow = measurer
            .measure("POSTER", &TextStyle { family: "Arial Narrow, sans-serif", ..style(30, None) });

        assert!(heavy.width > regular.width);
        assert!(black.width > regular.width);
        assert!(narrow.width < regular.width);
    }

    #[test]
    fn quarter_rotation_swaps_box() {
        let measurer = MetricMeasurer::default();
        let upright = measurer.measure("DATE", &style(16, None));
        let rotated =
            measurer.measure("DATE", &TextStyle { rotation: Rotation::Quarter, ..style(16, None) });
        assert_eq!(rotated, upright.rotated(Rotation::Quarter));
    }

    #[test]
    fn non_ascii_uses_average_width() {
        let measurer = MetricMeasurer::default();
        let extent = measurer.measure("ü", &style(10, None));
        assert!((extent.width - (AVERAGE_CHAR_WIDTH * 10.0 + 8.0)).abs() < 1e-4);
    }
}
