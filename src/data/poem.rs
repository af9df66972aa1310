//! Poem document and glyph layout.
//!
//! The poem is data: a YAML document with a title, an author, and the
//! body text. Layout turns it into positioned glyph slots, one per
//! visible glyph. Whitespace is skipped but still advances the cursor.

use serde::Deserialize;

/// YAML input format for a poem
#[derive(Debug, Deserialize)]
struct PoemInput {
    poem: PoemMeta,
    text: String,
}

#[derive(Debug, Deserialize)]
struct PoemMeta {
    title: String,
    author: String,
}

/// Parsed poem ready for layout
#[derive(Debug, Clone)]
pub struct Poem {
    pub title: String,
    pub author: String,
    /// Body lines; empty strings preserve stanza gaps
    pub body: Vec<String>,
}

impl Poem {
    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let input: PoemInput =
            serde_yaml::from_str(yaml).map_err(|e| format!("poem parse error: {}", e))?;

        if input.poem.title.trim().is_empty() {
            return Err("poem title is empty".to_string());
        }
        let body: Vec<String> = input.text.lines().map(|l| l.to_string()).collect();
        if body.iter().all(|l| l.trim().is_empty()) {
            return Err("poem text is empty".to_string());
        }

        Ok(Self {
            title: input.poem.title,
            author: input.poem.author,
            body,
        })
    }

    /// The built-in poem: Do Jong-hwan, «흔들리며 피는 꽃»
    pub fn built_in() -> Self {
        Self {
            title: "흔들리며 피는 꽃".to_string(),
            author: "도종환".to_string(),
            body: vec![
                "".to_string(),
                "흔들리지 않고 피는 꽃이 어디 있으랴".to_string(),
                "이 세상 그 어떤 아름다운 꽃들도".to_string(),
                "다 흔들리면서 피었나니".to_string(),
                "흔들리면서 줄기를 곧게 세웠나니".to_string(),
                "흔들리지 않고 가는 사랑이 어디 있으랴".to_string(),
                "".to_string(),
                "젖지 않고 피는 꽃이 어디 있으랴".to_string(),
                "이 세상 그 어떤 빛나는 꽃들도".to_string(),
                "다 젖으며 젖으며 피었나니".to_string(),
                "바람과 비에 젖으며 꽃잎 따뜻하게 피웠나니".to_string(),
                "젖지 않고 가는 삶이 어디 있으랴".to_string(),
            ],
        }
    }

    /// Lines in display order: title, author, then the body
    pub fn display_lines(&self) -> Vec<&str> {
        let mut lines = Vec::with_capacity(2 + self.body.len());
        lines.push(self.title.as_str());
        lines.push(self.author.as_str());
        lines.extend(self.body.iter().map(|l| l.as_str()));
        lines
    }
}

/// One visible glyph's layout slot (top-left corner)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSlot {
    pub ch: char,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Lay the poem out in the viewport. The first two lines (title, author)
/// are centred individually; body lines share the left edge of a centred
/// block sized to the longest body line.
pub fn layout_glyphs(
    poem: &Poem,
    viewport_w: f32,
    viewport_h: f32,
    glyph_size: f32,
    line_height: f32,
) -> Vec<GlyphSlot> {
    let lines = poem.display_lines();
    let advance = glyph_size * 0.95;

    let total_h = lines.len() as f32 * line_height;
    let mut y = (viewport_h - total_h) / 2.0;

    let max_body_len = lines
        .iter()
        .skip(2)
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let body_start_x = (viewport_w - max_body_len as f32 * advance) / 2.0;

    let mut slots = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let line_len = line.chars().count();
        let start_x = if index < 2 {
            (viewport_w - line_len as f32 * advance) / 2.0
        } else {
            body_start_x
        };

        for (i, ch) in line.chars().enumerate() {
            if !ch.is_whitespace() {
                slots.push(GlyphSlot {
                    ch,
                    x: start_x + i as f32 * advance,
                    y,
                    size: glyph_size,
                });
            }
        }
        y += line_height;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = "\
poem:
  title: 꽃
  author: 시인
text: |
  피어라 꽃
  지지 마라
";

    #[test]
    fn test_parse_yaml() {
        let poem = Poem::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(poem.title, "꽃");
        assert_eq!(poem.author, "시인");
        assert_eq!(poem.body.len(), 2);
        assert_eq!(poem.body[0], "피어라 꽃");
    }

    #[test]
    fn test_rejects_empty_text() {
        let yaml = "poem:\n  title: 꽃\n  author: 시인\ntext: \"  \"\n";
        assert!(Poem::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert!(Poem::from_yaml("poem:\n  title: 꽃\ntext: x\n").is_err());
    }

    #[test]
    fn test_built_in_poem_has_two_stanzas() {
        let poem = Poem::built_in();
        assert_eq!(poem.body.iter().filter(|l| l.is_empty()).count(), 2);
        assert!(poem.body.len() > 8);
    }

    #[test]
    fn test_layout_skips_whitespace() {
        let poem = Poem::from_yaml(SAMPLE_YAML).unwrap();
        let slots = layout_glyphs(&poem, 800.0, 600.0, 32.0, 40.0);
        let visible: usize = poem
            .display_lines()
            .iter()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).count())
            .sum();
        assert_eq!(slots.len(), visible);
        assert!(slots.iter().all(|s| !s.ch.is_whitespace()));
    }

    #[test]
    fn test_title_line_is_centred() {
        let poem = Poem::from_yaml(SAMPLE_YAML).unwrap();
        let slots = layout_glyphs(&poem, 800.0, 600.0, 32.0, 40.0);
        // Single-glyph title sits at the horizontal centre
        let title_slot = slots[0];
        assert_eq!(title_slot.ch, '꽃');
        let advance = 32.0 * 0.95;
        assert!((title_slot.x - (800.0 - advance) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_body_lines_share_left_edge() {
        let poem = Poem::from_yaml(SAMPLE_YAML).unwrap();
        let slots = layout_glyphs(&poem, 800.0, 600.0, 32.0, 40.0);
        let lines = poem.display_lines();
        let body_y0 = (600.0 - lines.len() as f32 * 40.0) / 2.0 + 2.0 * 40.0;
        let first_body: Vec<&GlyphSlot> =
            slots.iter().filter(|s| (s.y - body_y0).abs() < 1e-3).collect();
        let second_body: Vec<&GlyphSlot> = slots
            .iter()
            .filter(|s| (s.y - (body_y0 + 40.0)).abs() < 1e-3)
            .collect();
        assert!(!first_body.is_empty() && !second_body.is_empty());
        assert!((first_body[0].x - second_body[0].x).abs() < 1e-3);
    }

    #[test]
    fn test_rows_advance_by_line_height() {
        let poem = Poem::from_yaml(SAMPLE_YAML).unwrap();
        let slots = layout_glyphs(&poem, 800.0, 600.0, 32.0, 40.0);
        let mut ys: Vec<f32> = slots.iter().map(|s| s.y).collect();
        ys.dedup();
        for pair in ys.windows(2) {
            assert!((pair[1] - pair[0] - 40.0).abs() < 1e-3);
        }
    }
}
