//! Browser host
//!
//! Mounts effects on page elements, drives them from `requestAnimationFrame`
//! and window events, and tears everything down through one [`Teardown`].

mod canvas;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, HtmlElement, Window};

use crate::config::Config;
use crate::core::rng::{from_entropy, seeded};
use crate::core::{FxRng, Size, Vec2};
use crate::decrypt::DecryptText;
use crate::effect::{build, EffectKind, Scene};
use crate::error::MountError;
use crate::lifecycle::Teardown;
use crate::parallax::{LayerMotion, Parallax, SectionScroll};
use crate::theme::Theme;
use crate::time::now_seconds;

use canvas::CanvasSurface;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();
    info!("landing-fx loaded");
}

fn js_err(e: JsValue) -> MountError {
    MountError::Js(format!("{e:?}"))
}

fn window() -> Result<Window, MountError> {
    web_sys::window().ok_or(MountError::NoWindow)
}

fn element_by_id(window: &Window, id: &str) -> Result<web_sys::Element, MountError> {
    window
        .document()
        .ok_or(MountError::NoWindow)?
        .get_element_by_id(id)
        .ok_or_else(|| MountError::NotFound(id.to_string()))
}

fn html_element(window: &Window, id: &str) -> Result<HtmlElement, MountError> {
    element_by_id(window, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::NotFound(id.to_string()))
}

fn rng_for(seed: Option<u32>) -> FxRng {
    match seed {
        Some(s) => seeded(s as u64),
        None => from_entropy(),
    }
}

fn config_for(json: Option<String>) -> Result<Config, MountError> {
    match json {
        Some(text) => Ok(Config::from_json_str(&text)?),
        None => Ok(Config::default()),
    }
}

/// Add a DOM listener and register its removal with `teardown`. The closure
/// lives until the removal runs.
fn listen(
    target: &EventTarget,
    event: &'static str,
    teardown: &mut Teardown,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), MountError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref::<js_sys::Function>())
        .map_err(js_err)?;

    let target = target.clone();
    teardown.on_teardown(event, move || {
        let _ = target.remove_event_listener_with_callback(
            event,
            closure.as_ref().unchecked_ref::<js_sys::Function>(),
        );
        drop(closure);
    });
    Ok(())
}

/// CSS box and device pixel ratio the effect's canvas should cover.
fn measure(window: &Window, canvas: &HtmlCanvasElement, kind: EffectKind) -> (Size, f64) {
    if kind.sizes_from_element() {
        let rect = canvas.get_bounding_client_rect();
        (Size::new(rect.width(), rect.height()), window.device_pixel_ratio())
    } else {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (Size::new(w, h), 1.0)
    }
}

struct Host {
    scene: Scene,
    surface: CanvasSurface,
}

/// A running canvas effect. Call `destroy()` on unmount; dropping the handle
/// does the same.
#[wasm_bindgen]
pub struct FxHandle {
    host: Rc<RefCell<Host>>,
    teardown: Teardown,
}

#[wasm_bindgen]
impl FxHandle {
    pub fn set_dark(&self, dark: bool) {
        self.host.borrow_mut().scene.theme = Theme::from_dark(dark);
    }

    pub fn set_hovered(&self, hovered: bool) {
        self.host.borrow_mut().scene.hovered = hovered;
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> f64 {
        self.host.borrow().scene.frames() as f64
    }

    /// Stop the frame loop and remove every listener. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.teardown.run() {
            info!(kind = %self.host.borrow().scene.kind(), "Effect unmounted");
        }
    }
}

/// Mount `effect` (`field`, `network` or `grid`) on the canvas with id
/// `canvas_id`. `config_json` optionally overrides tuning constants.
#[wasm_bindgen]
pub fn mount(
    canvas_id: &str,
    effect: &str,
    dark: bool,
    seed: Option<u32>,
    config_json: Option<String>,
) -> Result<FxHandle, JsValue> {
    mount_effect(canvas_id, effect, dark, seed, config_json).map_err(|e| {
        warn!(canvas_id, error = %e, "Effect not started");
        JsValue::from_str(&e.to_string())
    })
}

fn mount_effect(
    canvas_id: &str,
    effect: &str,
    dark: bool,
    seed: Option<u32>,
    config_json: Option<String>,
) -> Result<FxHandle, MountError> {
    let kind: EffectKind = effect.parse().map_err(MountError::UnknownEffect)?;
    let config = config_for(config_json)?;
    let window = window()?;
    let canvas = element_by_id(&window, canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MountError::NotCanvas(canvas_id.to_string()))?;

    let mut surface = CanvasSurface::new(canvas.clone(), canvas_id)?;
    let (css, dpr) = measure(&window, &canvas, kind);
    let size = surface.fit(css, dpr);

    let scene = Scene::new(build(kind, size, &config, rng_for(seed)), Theme::from_dark(dark));
    let host = Rc::new(RefCell::new(Host { scene, surface }));
    let mut teardown = Teardown::new("canvas effect");

    {
        let host = host.clone();
        let win = window.clone();
        let canvas = canvas.clone();
        listen(&window, "resize", &mut teardown, move |_| {
            let (css, dpr) = measure(&win, &canvas, kind);
            let mut host = host.borrow_mut();
            let size = host.surface.fit(css, dpr);
            host.scene.resize(size);
        })?;
    }

    if kind == EffectKind::Network {
        let hover_target: EventTarget = match canvas.parent_element() {
            Some(parent) => parent.into(),
            None => canvas.clone().into(),
        };
        for (event, hovered) in [("pointerenter", true), ("pointerleave", false)] {
            let host = host.clone();
            listen(&hover_target, event, &mut teardown, move |_| {
                host.borrow_mut().scene.hovered = hovered;
            })?;
        }
    }

    start_frames(&window, host.clone(), &mut teardown)?;

    info!(canvas_id, %kind, width = size.width, height = size.height, dpr, "Effect mounted");
    Ok(FxHandle { host, teardown })
}

/// Self-rescheduling animation frame loop. The closure keeps itself alive
/// through `slot` until teardown takes it out.
fn start_frames(window: &Window, host: Rc<RefCell<Host>>, teardown: &mut Teardown) -> Result<(), MountError> {
    let token = teardown.token();
    let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

    let tick = {
        let slot = slot.clone();
        let frame_id = frame_id.clone();
        let window = window.clone();
        move |timestamp_ms: f64| {
            let live = {
                let mut host = host.borrow_mut();
                let Host { scene, surface } = &mut *host;
                surface.begin_frame();
                scene.step_if_live(&token, surface, timestamp_ms / 1000.0)
            };
            if !live {
                return;
            }
            if let Some(cb) = slot.borrow().as_ref() {
                match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(Some(id)),
                    Err(e) => warn!(?e, "requestAnimationFrame failed, animation stopped"),
                }
            }
        }
    };
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(tick) as Box<dyn FnMut(f64)>));

    let first = slot
        .borrow()
        .as_ref()
        .map(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()));
    if let Some(result) = first {
        frame_id.set(Some(result.map_err(js_err)?));
    }

    let window = window.clone();
    teardown.on_teardown("animation frame", move || {
        if let Some(id) = frame_id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the closure <-> slot cycle
        slot.borrow_mut().take();
    });
    Ok(())
}

/// Hero background parallax bound to scroll and pointer movement.
#[wasm_bindgen]
pub struct ParallaxHandle {
    teardown: Teardown,
}

#[wasm_bindgen]
impl ParallaxHandle {
    pub fn destroy(&mut self) {
        self.teardown.run();
    }
}

#[wasm_bindgen]
pub fn mount_parallax(grid_id: &str, orb_a_id: &str, orb_b_id: &str) -> Result<ParallaxHandle, JsValue> {
    mount_parallax_layers(grid_id, orb_a_id, orb_b_id).map_err(|e| {
        warn!(error = %e, "Parallax not started");
        JsValue::from_str(&e.to_string())
    })
}

fn mount_parallax_layers(grid_id: &str, orb_a_id: &str, orb_b_id: &str) -> Result<ParallaxHandle, MountError> {
    let window = window()?;
    let layers = Rc::new([
        html_element(&window, grid_id)?,
        html_element(&window, orb_a_id)?,
        html_element(&window, orb_b_id)?,
    ]);
    let state = Rc::new(Cell::new(Parallax::default()));
    let mut teardown = Teardown::new("parallax");

    let apply = {
        let layers = layers.clone();
        move |p: Parallax| {
            let now_ms = now_seconds() * 1000.0;
            let transforms = [p.grid(), p.primary_orb(now_ms), p.secondary_orb(now_ms)];
            for (layer, t) in layers.iter().zip(transforms) {
                let _ = layer.style().set_property("transform", &t.css());
            }
        }
    };

    {
        let state = state.clone();
        let win = window.clone();
        let apply = apply.clone();
        listen(&window, "scroll", &mut teardown, move |_| {
            let mut p = state.get();
            p.scroll_y = win.scroll_y().unwrap_or(0.0);
            state.set(p);
            apply(p);
        })?;
    }
    {
        let state = state.clone();
        let apply = apply.clone();
        listen(&window, "pointermove", &mut teardown, move |event| {
            let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            let mut p = state.get();
            p.pointer = Vec2::new(mouse.client_x() as f64, mouse.client_y() as f64);
            state.set(p);
            apply(p);
        })?;
    }

    // First paint, before any scroll or pointer event
    let mut initial = state.get();
    initial.scroll_y = window.scroll_y().unwrap_or(0.0);
    state.set(initial);
    apply(initial);

    debug!(grid_id, orb_a_id, orb_b_id, "Parallax mounted");
    Ok(ParallaxHandle { teardown })
}

/// Read `data-drift`, `data-bob` and `data-phase` (pixels, pixels, progress
/// units) from a layer element. Missing or malformed values count as 0.
fn layer_motion(element: &HtmlElement) -> LayerMotion {
    let attr = |name: &str| {
        element
            .get_attribute(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    };
    LayerMotion { drift: attr("data-drift"), bob: attr("data-bob"), phase: attr("data-phase") }
}

/// Section scroll parallax: every layer in `layer_ids` moves with how far
/// `section_id` has scrolled past the viewport top.
#[wasm_bindgen]
pub fn mount_section_parallax(section_id: &str, layer_ids: Vec<String>) -> Result<ParallaxHandle, JsValue> {
    mount_section_layers(section_id, &layer_ids).map_err(|e| {
        warn!(section_id, error = %e, "Section parallax not started");
        JsValue::from_str(&e.to_string())
    })
}

fn mount_section_layers(section_id: &str, layer_ids: &[String]) -> Result<ParallaxHandle, MountError> {
    let window = window()?;
    let section = element_by_id(&window, section_id)?;
    let layers = layer_ids
        .iter()
        .map(|id| html_element(&window, id).map(|el| {
            let motion = layer_motion(&el);
            (el, motion)
        }))
        .collect::<Result<Vec<_>, _>>()?;
    let mut teardown = Teardown::new("section parallax");

    let apply = move || {
        let rect = section.get_bounding_client_rect();
        let scroll = SectionScroll::from_rect(rect.top(), rect.height());
        for (layer, motion) in &layers {
            let _ = layer.style().set_property("transform", &scroll.layer(*motion).css());
        }
    };
    apply();
    listen(&window, "scroll", &mut teardown, move |_| apply())?;

    debug!(section_id, layers = layer_ids.len(), "Section parallax mounted");
    Ok(ParallaxHandle { teardown })
}

/// Scrambled-text reveal running on an interval timer.
#[wasm_bindgen]
pub struct TextHandle {
    teardown: Teardown,
}

#[wasm_bindgen]
impl TextHandle {
    pub fn destroy(&mut self) {
        self.teardown.run();
    }
}

/// Decrypt the current text content of `element_id` in place.
#[wasm_bindgen]
pub fn mount_decrypt(element_id: &str, seed: Option<u32>, config_json: Option<String>) -> Result<TextHandle, JsValue> {
    mount_decrypt_text(element_id, seed, config_json).map_err(|e| {
        warn!(element_id, error = %e, "Decrypt text not started");
        JsValue::from_str(&e.to_string())
    })
}

fn mount_decrypt_text(
    element_id: &str,
    seed: Option<u32>,
    config_json: Option<String>,
) -> Result<TextHandle, MountError> {
    let config = config_for(config_json)?.decrypt;
    let window = window()?;
    let element = element_by_id(&window, element_id)?;
    let text = element.text_content().unwrap_or_default();

    let mut effect = DecryptText::new(&text, &config.charset);
    let mut rng = rng_for(seed);
    let mut delay_ticks = config.delay_ms.div_ceil(config.tick_ms);
    let interval_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let tick = {
        let window = window.clone();
        let interval_id = interval_id.clone();
        let element = element.clone();
        move || {
            if delay_ticks > 0 {
                delay_ticks -= 1;
                return;
            }
            let frame = effect.tick(&mut rng);
            element.set_text_content(Some(frame));
            if effect.is_done() {
                if let Some(id) = interval_id.take() {
                    window.clear_interval_with_handle(id);
                }
            }
        }
    };
    let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            config.tick_ms as i32,
        )
        .map_err(js_err)?;
    interval_id.set(Some(id));

    let mut teardown = Teardown::new("decrypt text");
    teardown.on_teardown("interval", move || {
        if let Some(id) = interval_id.take() {
            window.clear_interval_with_handle(id);
        }
        // Leave the real text behind
        element.set_text_content(Some(&text));
        drop(closure);
    });

    debug!(element_id, "Decrypt text mounted");
    Ok(TextHandle { teardown })
}
