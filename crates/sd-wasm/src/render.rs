// ============================================================================
// SPINDECK — Canvas renderer
// Draws one Game frame onto a 2D context
// ============================================================================

use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use sd_core::{Ease, Insets, Point, Rect, Size};
use sd_game::Game;
use sd_media::SkeletalAnimation;
use sd_reels::{Reel, SlotMachine};
use sd_ui::{BaseButton, ButtonState};

use crate::assets::HtmlAssets;

const BACKDROP: &str = "rgba(0, 0, 0, 0.5)";
const SCREEN: &str = "#101018";
const FRAME_COLOR: &str = "#f5c542";
const MISSING_TEXTURE: &str = "#444455";
/// Horizontal smear copies per 4 px of blur
const BLUR_STEP: f64 = 4.0;

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    assets: Rc<HtmlAssets>,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d, assets: Rc<HtmlAssets>) -> Self {
        Self { ctx, assets }
    }

    pub fn draw(&self, game: &Game) -> Result<(), JsValue> {
        let screen = game.ui().screen();
        self.ctx.set_fill_style_str(SCREEN);
        self.ctx.fill_rect(0.0, 0.0, screen.width, screen.height);

        self.draw_machine(game.machine())?;
        if let Some(button) = game.ui().spin_button() {
            self.draw_button(button)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // MACHINE
    // ------------------------------------------------------------------------

    fn draw_machine(&self, machine: &SlotMachine) -> Result<(), JsValue> {
        let layout = machine.layout();
        self.ctx.save();
        self.ctx.translate(layout.origin.x, layout.origin.y)?;

        fill_rect(&self.ctx, layout.background, BACKDROP);

        self.ctx.save();
        self.ctx.begin_path();
        self.ctx
            .rect(layout.panel.x, layout.panel.y, layout.panel.width, layout.panel.height);
        self.ctx.clip();
        for reel in machine.reel_group().reels() {
            self.draw_reel(machine, reel)?;
        }
        self.ctx.restore();

        if let Some(frame) = machine.frame_animation().filter(|a| a.is_visible()) {
            self.draw_frame(frame, layout.background);
        }
        if let Some(win) = machine.win_animation().filter(|a| a.is_visible()) {
            self.draw_win(win, layout.decoration_anchor)?;
        }

        self.ctx.restore();
        Ok(())
    }

    fn draw_reel(&self, machine: &SlotMachine, reel: &Reel) -> Result<(), JsValue> {
        let size = reel.height();
        let blur = reel.blur();
        let copies = (blur / BLUR_STEP).ceil().max(1.0) as usize;
        let alpha = 1.0 / copies as f64;

        self.ctx.set_global_alpha(alpha);
        for symbol in reel.symbols() {
            let image = machine
                .texture_name(symbol.texture)
                .and_then(|name| self.assets.image(name));
            for copy in 0..copies {
                // smear trails to the right of the leftward motion
                let dx = if copies > 1 {
                    blur * copy as f64 / (copies - 1) as f64
                } else {
                    0.0
                };
                let dest = Rect::new(symbol.x + dx, reel.y(), size, size);
                match &image {
                    Some(image) => self.draw_image(image, dest)?,
                    None => fill_rect(&self.ctx, dest.inflate(-4.0), MISSING_TEXTURE),
                }
            }
        }
        self.ctx.set_global_alpha(1.0);
        Ok(())
    }

    /// Looping frame: border whose width breathes with the clip
    fn draw_frame(&self, frame: &SkeletalAnimation, bounds: Rect) {
        let pulse = 0.5 - 0.5 * (frame.progress() * TAU).cos();
        self.ctx.set_stroke_style_str(FRAME_COLOR);
        self.ctx.set_line_width(4.0 + 4.0 * pulse);
        self.ctx
            .stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);
    }

    /// One-shot win burst: text that pops with a back-out scale
    fn draw_win(&self, win: &SkeletalAnimation, anchor: Point) -> Result<(), JsValue> {
        let scale = Ease::BackOut.evaluate((win.progress() * 3.0).min(1.0));
        let fade = 1.0 - ((win.progress() - 0.8) / 0.2).clamp(0.0, 1.0);
        self.ctx.save();
        self.ctx.set_global_alpha(fade);
        self.ctx.translate(anchor.x, anchor.y)?;
        self.ctx.scale(scale, scale)?;
        self.ctx.set_font("bold 160px Arial");
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(FRAME_COLOR);
        self.ctx.fill_text("WIN", 0.0, 0.0)?;
        self.ctx.restore();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // BUTTON
    // ------------------------------------------------------------------------

    fn draw_button(&self, button: &BaseButton) -> Result<(), JsValue> {
        let plane = button.plane();
        let origin = button.position();
        let top_left = plane.top_left();

        self.ctx.save();
        self.ctx.translate(origin.x, origin.y)?;
        if button.state() == ButtonState::Deactive {
            self.ctx.set_global_alpha(0.5);
        }

        let dest = Rect::from_origin_size(top_left, plane.size);
        match plane.texture.as_deref().and_then(|t| self.assets.image(t)) {
            Some(image) => self.draw_nine_slice(&image, plane.padding, dest)?,
            None => fill_rect(&self.ctx, dest, MISSING_TEXTURE),
        }

        if let Some(icon) = button.icon() {
            if let Some(image) = self.assets.image(&icon.texture) {
                let size = icon.size();
                let at = Point::new(
                    icon.position.x - icon.anchor.x * size.width,
                    icon.position.y - icon.anchor.y * size.height,
                );
                self.draw_image(&image, Rect::from_origin_size(at, size))?;
            }
        }

        if let Some(label) = button.label() {
            let size = label.size();
            // position is the anchor point; text is drawn around its centre
            let x = label.position.x + (0.5 - label.anchor.x) * size.width;
            let y = label.position.y + (0.5 - label.anchor.y) * size.height;
            let lines: Vec<&str> = label.text.split('\n').collect();
            let line_height = size.height / lines.len() as f64;

            self.ctx
                .set_font(&label.style.css_font(label.effective_font_size() * label.scale));
            self.ctx.set_fill_style_str(&label.style.fill.to_css());
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            for (i, line) in lines.iter().enumerate() {
                let ly = y - size.height / 2.0 + line_height * (i as f64 + 0.5);
                self.ctx.fill_text(line, x, ly)?;
            }
        }

        self.ctx.restore();
        Ok(())
    }

    /// Corners unscaled, edges stretched along one axis, centre both
    fn draw_nine_slice(
        &self,
        image: &HtmlImageElement,
        padding: Insets,
        dest: Rect,
    ) -> Result<(), JsValue> {
        let src = Size::new(image.natural_width() as f64, image.natural_height() as f64);
        let src_cols = [0.0, padding.left, src.width - padding.right, src.width];
        let src_rows = [0.0, padding.top, src.height - padding.bottom, src.height];
        let dst_cols = [
            dest.x,
            dest.x + padding.left,
            dest.right() - padding.right,
            dest.right(),
        ];
        let dst_rows = [
            dest.y,
            dest.y + padding.top,
            dest.bottom() - padding.bottom,
            dest.bottom(),
        ];

        for row in 0..3 {
            for col in 0..3 {
                let (sw, sh) = (
                    src_cols[col + 1] - src_cols[col],
                    src_rows[row + 1] - src_rows[row],
                );
                let (dw, dh) = (
                    dst_cols[col + 1] - dst_cols[col],
                    dst_rows[row + 1] - dst_rows[row],
                );
                if sw <= 0.0 || sh <= 0.0 || dw <= 0.0 || dh <= 0.0 {
                    continue;
                }
                self.ctx
                    .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        image,
                        src_cols[col],
                        src_rows[row],
                        sw,
                        sh,
                        dst_cols[col],
                        dst_rows[row],
                        dw,
                        dh,
                    )?;
            }
        }
        Ok(())
    }

    fn draw_image(&self, image: &HtmlImageElement, dest: Rect) -> Result<(), JsValue> {
        self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            dest.x,
            dest.y,
            dest.width,
            dest.height,
        )
    }
}

fn fill_rect(ctx: &CanvasRenderingContext2d, rect: Rect, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
}
