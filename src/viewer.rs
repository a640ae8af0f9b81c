//! Windowed presentation with raylib.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use raylib::prelude::*;

use crate::constants::*;
use crate::slide::Slide;
use crate::slideshow::Slideshow;
use crate::source::ElementSource;
use crate::texture_loader::load_texture_with_exif_rotation;

const MARGIN: f32 = 60.0;
const FONT_SIZE: i32 = 48;

fn tint(opacity: f32) -> Color {
    Color::new(255, 255, 255, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

pub fn run(deck: &Slideshow, video_length: Duration) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Presents")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load textures and media up front ---
    let mut textures: HashMap<PathBuf, Texture2D> = HashMap::new();
    for slide in deck.slides() {
        for element in slide.elements() {
            if let ElementSource::Image { src } = element.source() {
                if textures.contains_key(src) {
                    continue;
                }
                match load_texture_with_exif_rotation(&mut rl, &thread, src) {
                    Ok(texture) => {
                        textures.insert(src.clone(), texture);
                    }
                    Err(e) => warn!("slide `{}`: {:#}", slide.id(), e),
                }
            }
        }
        if let Some(media) = slide.media() {
            media.load_metadata(media.length_hint().unwrap_or(video_length))?;
        }
    }

    let container = (RENDER_WIDTH as f32, RENDER_HEIGHT as f32);
    let window = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
    deck.stage().fill(window, container);

    deck.start()?;
    info!("presenting {} slides", deck.len());

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) || rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            deck.next()?;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            deck.prev()?;
        }

        deck.tick(Duration::from_secs_f32(rl.get_frame_time()))?;

        if deck.options().full_screen && rl.is_window_resized() {
            let window = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
            deck.stage().fill(window, container);
        }

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        let scale = deck.stage().scale();
        // Scaled around the top centre of the window
        let origin_x = (d.get_screen_width() as f32 - container.0 * scale) * 0.5;
        for slide in deck.slides().iter().filter(|s| s.style().visible) {
            draw_slide(&mut d, slide, &textures, origin_x, scale);
        }

        if let Some(opacity) = deck.stage().overlay() {
            let alpha = (opacity * 255.0) as u8;
            d.draw_rectangle(0, 0, d.get_screen_width(), d.get_screen_height(), Color::new(0, 0, 0, alpha));
        }
    }
    Ok(())
}

fn draw_slide(
    d: &mut RaylibDrawHandle,
    slide: &Slide,
    textures: &HashMap<PathBuf, Texture2D>,
    origin_x: f32,
    scale: f32,
) {
    let style = slide.style();
    let elements = slide.elements();
    let rows = elements.len().max(1) as f32;
    let row_height = (RENDER_HEIGHT as f32 - MARGIN * 2.0) / rows;
    let left = origin_x + (style.offset_x + MARGIN) * scale;

    for (i, element) in elements.iter().enumerate() {
        let top = (MARGIN + row_height * i as f32) * scale;
        let color = tint(style.opacity * element.opacity());
        match element.source() {
            ElementSource::Text { text } => {
                d.draw_text(text, left as i32, top as i32, (FONT_SIZE as f32 * scale) as i32, color);
            }
            ElementSource::Image { src } => {
                let Some(texture) = textures.get(src) else {
                    continue;
                };
                let (tex_width, tex_height) = (texture.width() as f32, texture.height() as f32);
                let box_width = RENDER_WIDTH as f32 - MARGIN * 2.0;
                // Fit inside the row without upscaling
                let fit = (box_width / tex_width).min(row_height / tex_height).min(1.0) * scale;
                let (width, height) = (tex_width * fit, tex_height * fit);
                let x = left + (box_width * scale - width) * 0.5;
                d.draw_texture_pro(
                    texture,
                    Rectangle::new(0.0, 0.0, tex_width, tex_height),
                    Rectangle::new(x, top, width, height),
                    Vector2::new(0.0, 0.0),
                    0.0,
                    color,
                );
            }
            ElementSource::Video { src, .. } => {
                let progress = slide
                    .media()
                    .filter(|m| m.src() == src && !m.length().is_zero())
                    .map_or(0.0, |m| m.position().as_secs_f32() / m.length().as_secs_f32());
                d.draw_text(&format!("> {src}"), left as i32, top as i32, (FONT_SIZE as f32 * scale) as i32, color);
                let bar_width = (RENDER_WIDTH as f32 - MARGIN * 2.0) * scale;
                let bar_top = top as i32 + (FONT_SIZE as f32 * 1.5 * scale) as i32;
                d.draw_rectangle(left as i32, bar_top, (bar_width * progress) as i32, (8.0 * scale) as i32, color);
            }
        }
    }
}
