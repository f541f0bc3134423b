// ============================================================================
// SPINDECK — Pointer input
// Canvas pointer listeners mapped to sd-ui pointer events
// ============================================================================

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, PointerEvent as DomPointerEvent};

use sd_core::Point;
use sd_ui::PointerEvent;

/// Canvas pixel position of a DOM pointer event, corrected for CSS scaling
pub fn canvas_point(canvas: &HtmlCanvasElement, evt: &DomPointerEvent) -> Point {
    let sx = scale(canvas.width(), canvas.client_width());
    let sy = scale(canvas.height(), canvas.client_height());
    Point::new(evt.offset_x() as f64 * sx, evt.offset_y() as f64 * sy)
}

fn scale(buffer: u32, css: i32) -> f64 {
    if css > 0 {
        buffer as f64 / css as f64
    } else {
        1.0
    }
}

/// Attach move/down/up/leave listeners; `sink` receives every mapped event.
///
/// Events stop propagating at the canvas.
pub fn attach<F>(canvas: &HtmlCanvasElement, sink: F) -> Result<(), JsValue>
where
    F: Fn(PointerEvent) + Clone + 'static,
{
    type Map = fn(Point) -> PointerEvent;
    let mapped: [(&str, Map); 3] = [
        ("pointermove", PointerEvent::Move),
        ("pointerdown", PointerEvent::Down),
        ("pointerup", PointerEvent::Up),
    ];

    for (name, map) in mapped {
        let target = canvas.clone();
        let sink = sink.clone();
        let closure = Closure::wrap(Box::new(move |evt: DomPointerEvent| {
            evt.stop_propagation();
            sink(map(canvas_point(&target, &evt)));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let closure = Closure::wrap(Box::new(move |evt: DomPointerEvent| {
        evt.stop_propagation();
        sink(PointerEvent::Leave);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_follows_css_size() {
        assert_eq!(scale(1920, 960), 2.0);
        assert_eq!(scale(1080, 1080), 1.0);
        // display:none reports zero client size
        assert_eq!(scale(1920, 0), 1.0);
    }
}
