//! Headless reveal simulation

use anyhow::{Context, Result};
use verdant_core::{Document, Element, GlyphColor, Rect, Size};
use verdant_reveal::{setup, try_bind, EngineConfig, Page, RevealBinding, SmoothScroll};

const FRAME: f32 = 1.0 / 60.0;

pub struct Options {
    pub text: String,
    pub frames: u32,
    pub step: f32,
    pub viewport: Size,
    pub every: u32,
    pub config: EngineConfig,
}

/// Scroll a page down by `step` every frame and print the reveal state
pub async fn run(options: Options) -> Result<()> {
    let page = Page::new(Document::interactive(options.viewport));
    page.load_modules(&options.config)
        .await
        .context("failed to load engine modules")?;

    // Text one and a half screens down, four screens of content
    let height = options.viewport.height;
    let container = page.document().create_element();
    container.set_content_height(height * 4.0);
    let text = page.document().create_element();
    text.set_rect(Rect::new(0.0, height * 1.5, options.viewport.width, 48.0));
    text.set_text(options.text.as_str());

    let scroll = setup(&page, Some(&container))
        .await
        .context("smooth scrolling is unavailable")?;
    let binding = try_bind(&page, Some(&text), Some(&container))
        .await
        .context("failed to bind reveal effects")?;

    println!(
        "{:>6}  {:>8}  {:>6}  {:>6}  {:>9}  words (opacity@y)",
        "frame", "offset", "color", "wave", "glyphs"
    );
    for frame in 1..=options.frames {
        scroll.scroll_by(options.step);
        page.tick(FRAME);
        if frame % options.every == 0 || frame == options.frames {
            print_frame(frame, &page, &scroll, &text, binding);
        }
    }

    println!();
    println!("{}", text.markup());

    scroll.dispose();
    tracing::info!(frames = options.frames, "simulation finished");
    Ok(())
}

fn print_frame(
    frame: u32,
    page: &Page,
    scroll: &SmoothScroll,
    text: &Element,
    binding: RevealBinding,
) {
    let (color, wave) = {
        let triggers = page.triggers().borrow();
        (
            triggers.progress(binding.color_reveal).unwrap_or_default(),
            triggers.progress(binding.word_wave).unwrap_or_default(),
        )
    };

    let glyphs = text.glyph_styles();
    let revealed = glyphs
        .iter()
        .filter(|glyph| glyph.color != GlyphColor::Inherit)
        .count();

    let words: Vec<String> = text
        .word_styles()
        .iter()
        .map(|word| format!("{:.2}@{:+.1}", word.opacity, word.translate_y))
        .collect();

    println!(
        "{frame:>6}  {:>8.1}  {color:>6.3}  {wave:>6.3}  {:>9}  {}",
        scroll.virtual_offset(),
        format!("{revealed}/{}", glyphs.len()),
        words.join(" ")
    );
}
