use std::fmt::{self, Write as _};

use poster_layout::{DecorativeGlyph, PlacedModule, PosterLayout};

const GRID_LINE_COLOR: &str = "rgba(0,0,255,0.12)";

/// Static SVG preview of a layout.
///
/// Modules are drawn as single-line text centred in their boxes; wrapping is
/// left to the viewer's imagination.
pub fn render(layout: &PosterLayout) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_document(&mut out, layout)?;
    Ok(out)
}

fn write_document(out: &mut String, layout: &PosterLayout) -> fmt::Result {
    let width = layout.canvas.width;
    let height = layout.canvas.height;

    writeln!(
        out,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##
    )?;
    writeln!(out, r##"  <rect width="{width}" height="{height}" fill="#fff"/>"##)?;

    let (columns, rows) = layout.grid_lines();
    for x in columns {
        writeln!(
            out,
            r##"  <line x1="{x}" y1="0" x2="{x}" y2="{height}" stroke="{GRID_LINE_COLOR}"/>"##
        )?;
    }
    for y in rows {
        writeln!(
            out,
            r##"  <line x1="0" y1="{y}" x2="{width}" y2="{y}" stroke="{GRID_LINE_COLOR}"/>"##
        )?;
    }

    for glyph in &layout.glyphs {
        write_glyph(out, glyph)?;
    }
    for module in &layout.modules {
        write_module(out, module)?;
    }

    out.write_str("</svg>\n")
}

fn write_glyph(out: &mut String, glyph: &DecorativeGlyph) -> fmt::Result {
    writeln!(
        out,
        r##"  <text x="{x}" y="{y}" font-size="{size}" font-family="{family}" text-anchor="middle" dominant-baseline="central" transform="rotate({rot} {x} {y})">{text}</text>"##,
        x = glyph.left,
        y = glyph.top,
        size = glyph.font_size,
        family = escape(&glyph.font_family),
        rot = glyph.rotation.degrees(),
        text = escape(&glyph.text),
    )
}

fn write_module(out: &mut String, module: &PlacedModule) -> fmt::Result {
    let bounds = module.bounds;
    let x = bounds.left + bounds.width / 2.0;
    let y = bounds.top + bounds.height / 2.0;
    writeln!(
        out,
        r##"  <text x="{x}" y="{y}" font-size="{size}" font-weight="{weight}" font-family="{family}" text-anchor="middle" dominant-baseline="central" transform="rotate({rot} {x} {y})">{text}</text>"##,
        size = module.font_size.unwrap_or_default(),
        weight = module.module.weight,
        family = escape(&module.font_family),
        rot = module.placement.rotation.degrees(),
        text = escape(&module.module.value),
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use poster_layout::{CanvasSize, GridShape};

    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r##"<a & "b">"##), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn draws_interior_grid_lines() {
        let layout = PosterLayout {
            canvas: CanvasSize::new(300.0, 450.0),
            grid_index: 0,
            grid: GridShape::rect(3, 2),
            modules: Vec::new(),
            glyphs: Vec::new(),
        };
        let svg = render(&layout).unwrap();
        assert_eq!(svg.matches("<line").count(), 3);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
