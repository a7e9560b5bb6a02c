//! Browser host: mounts a demo into the page's `#app` container.
//!
//! The canvas, the DOM label overlay and every listener are created once by
//! [`start`]. The engine lives in an `Rc<RefCell<..>>` shared by the
//! listeners and a `requestAnimationFrame` loop that reschedules itself
//! every frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gloo_net::http::Request;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    PointerEvent, WheelEvent, Window,
};

use crate::demo::DemoKind;
use crate::engine::command::Command;
use crate::engine::DemoEngine;
use crate::error::OrbisError;
use crate::geo::CityCatalog;
use crate::gpu::texture::TextureData;
use crate::input::{InputEvent, MouseButton};
use crate::options::Options;

type SharedEngine = Rc<RefCell<DemoEngine>>;
type LabelElements = Rc<Vec<HtmlElement>>;

/// Wheel `deltaY` pixels per zoom step.
const WHEEL_SCALE: f32 = 0.01;

static INIT_LOGGING: Once = Once::new();

fn init_logging() {
    INIT_LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&JsValue::from_str("logger already set"));
        }
    });
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Mount `demo` (`"cube"`, `"globe"` or `"capitals"`) into `#app`.
///
/// # Errors
///
/// Returns an error for an unknown demo name. GPU and DOM failures are
/// logged to the console once setup runs.
#[wasm_bindgen]
pub fn start(demo: &str) -> Result<(), JsValue> {
    init_logging();
    let demo: DemoKind = demo.parse().map_err(js_error)?;
    log::info!("starting {demo} demo");

    spawn_local(async move {
        if let Err(e) = mount(demo).await {
            log::error!("failed to start {demo} demo: {e:?}");
        }
    });
    Ok(())
}

async fn mount(demo: DemoKind) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let container: HtmlElement = document
        .query_selector("#app")?
        .ok_or_else(|| js_error("missing #app container"))?
        .dyn_into()?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.style().set_property("width", "100%")?;
    canvas.style().set_property("height", "100%")?;
    canvas.style().set_property("display", "block")?;
    let _ = container.append_child(&canvas)?;

    let (width, height) = drawable_size(&window, &container);
    canvas.set_width(width);
    canvas.set_height(height);

    let options = Options::default();
    let texture_path = options.display.texture_path.clone();
    let mut engine = DemoEngine::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        (width, height),
        demo,
        options,
    )
    .await
    .map_err(js_error)?;
    // The DOM overlay replaces the in-frame markers.
    engine.set_label_markers(false);
    let engine: SharedEngine = Rc::new(RefCell::new(engine));

    let labels = create_label_elements(&document, &container, &engine)?;
    install_resize_listener(&window, &container, &canvas, &engine)?;
    install_pointer_listeners(&window, &container, &engine)?;
    install_key_listener(&window, &engine)?;
    spawn_texture_fetch(texture_path, Rc::clone(&engine));
    start_frame_loop(window, engine, labels);
    Ok(())
}

/// Container size in physical pixels.
fn drawable_size(window: &Window, container: &HtmlElement) -> (u32, u32) {
    let dpr = window.device_pixel_ratio();
    let width = (f64::from(container.client_width()) * dpr) as u32;
    let height = (f64::from(container.client_height()) * dpr) as u32;
    (width, height)
}

fn listen<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// ── Labels ───────────────────────────────────────────────────────────────

/// One `div.label` per capital, in catalog order so element `i` mirrors
/// label `i`. Clicking one flies to it and marks it `selected`.
fn create_label_elements(
    document: &Document,
    container: &HtmlElement,
    engine: &SharedEngine,
) -> Result<LabelElements, JsValue> {
    let catalog = CityCatalog::capitals().map_err(js_error)?;
    let mut elements = Vec::with_capacity(catalog.len());
    for city in catalog.cities() {
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_class_name("label");
        el.set_text_content(Some(&city.name));
        el.style().set_property("display", "none")?;
        let _ = container.append_child(&el)?;
        elements.push(el);
    }
    let elements: LabelElements = Rc::new(elements);

    for (index, el) in elements.iter().enumerate() {
        // Keep label presses away from the canvas drag handling.
        listen(el, "pointerdown", |evt: PointerEvent| evt.stop_propagation())?;

        let engine = Rc::clone(engine);
        let all = Rc::clone(&elements);
        listen(el, "click", move |evt: web_sys::MouseEvent| {
            evt.stop_propagation();
            let mut engine = engine.borrow_mut();
            engine.execute(Command::SelectLabel { index });
            for (i, other) in all.iter().enumerate() {
                let _ = other.class_list().toggle_with_force("selected", i == index);
            }
        })?;
    }
    Ok(elements)
}

/// Move label elements to their projected positions and hide the ones the
/// globe occludes.
fn sync_labels(engine: &DemoEngine, elements: &[HtmlElement], dpr: f64) {
    let labels = engine.stage().labels();
    for (index, el) in elements.iter().enumerate() {
        let label = labels.get(index);
        let selected = label.is_some_and(|label| label.selected);
        let _ = el.class_list().toggle_with_force("selected", selected);

        let style = el.style();
        let Some(offset) = label.and_then(|label| label.overlay_offset(dpr as f32)) else {
            let _ = style.set_property("display", "none");
            continue;
        };
        let _ = style.set_property("display", "block");
        let _ = style.set_property(
            "transform",
            &format!("translate({:.1}px, {:.1}px)", offset.x, offset.y),
        );
    }
}

// ── Listeners ────────────────────────────────────────────────────────────

fn install_resize_listener(
    window: &Window,
    container: &HtmlElement,
    canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
) -> Result<(), JsValue> {
    let win = window.clone();
    let container = container.clone();
    let canvas = canvas.clone();
    let engine = Rc::clone(engine);
    listen(window, "resize", move |_: web_sys::Event| {
        let (width, height) = drawable_size(&win, &container);
        log::debug!("window resized to {width}x{height}");
        if width > 0 && height > 0 {
            canvas.set_width(width);
            canvas.set_height(height);
        }
        engine.borrow_mut().resize(width, height);
    })
}

/// Pointer position relative to the container, in physical pixels.
fn pointer_position(window: &Window, container: &HtmlElement, evt: &PointerEvent) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio();
    let x = (f64::from(evt.client_x()) - rect.left()) * dpr;
    let y = (f64::from(evt.client_y()) - rect.top()) * dpr;
    (x as f32, y as f32)
}

fn install_pointer_listeners(
    window: &Window,
    container: &HtmlElement,
    engine: &SharedEngine,
) -> Result<(), JsValue> {
    {
        let engine = Rc::clone(engine);
        let win = window.clone();
        let cont = container.clone();
        listen(container, "pointerdown", move |evt: PointerEvent| {
            let (x, y) = pointer_position(&win, &cont, &evt);
            let mut engine = engine.borrow_mut();
            let _ = engine.handle_input(InputEvent::ModifiersChanged {
                shift: evt.shift_key(),
            });
            let _ = engine.handle_input(InputEvent::CursorMoved { x, y });
            let _ = engine.handle_input(InputEvent::MouseButton {
                button: MouseButton::from_dom(evt.button()),
                pressed: true,
            });
        })?;
    }

    // Moves and releases go to the window so drags that leave the
    // container still end.
    {
        let engine = Rc::clone(engine);
        let win = window.clone();
        let cont = container.clone();
        listen(window, "pointermove", move |evt: PointerEvent| {
            let (x, y) = pointer_position(&win, &cont, &evt);
            let _ = engine
                .borrow_mut()
                .handle_input(InputEvent::CursorMoved { x, y });
        })?;
    }
    {
        let engine = Rc::clone(engine);
        listen(window, "pointerup", move |evt: PointerEvent| {
            let _ = engine.borrow_mut().handle_input(InputEvent::MouseButton {
                button: MouseButton::from_dom(evt.button()),
                pressed: false,
            });
        })?;
    }
    {
        let engine = Rc::clone(engine);
        listen(container, "wheel", move |evt: WheelEvent| {
            let delta = -(evt.delta_y() as f32) * WHEEL_SCALE;
            let _ = engine
                .borrow_mut()
                .handle_input(InputEvent::Scroll { delta });
        })?;
    }
    // Suppress the browser menu so right-drag can pan.
    listen(container, "contextmenu", |evt: web_sys::MouseEvent| {
        evt.prevent_default();
    })
}

fn install_key_listener(window: &Window, engine: &SharedEngine) -> Result<(), JsValue> {
    let engine = Rc::clone(engine);
    listen(window, "keydown", move |evt: KeyboardEvent| {
        if evt.repeat() {
            return;
        }
        let _ = engine.borrow_mut().handle_key_press(&evt.code());
    })
}

// ── Texture ──────────────────────────────────────────────────────────────

async fn fetch_texture(path: &str) -> Result<TextureData, OrbisError> {
    let resp = Request::get(path)
        .send()
        .await
        .map_err(|e| OrbisError::Texture(format!("{path}: {e}")))?;
    if !resp.ok() {
        return Err(OrbisError::Texture(format!(
            "{path}: HTTP {}",
            resp.status()
        )));
    }
    let bytes = resp
        .binary()
        .await
        .map_err(|e| OrbisError::Texture(format!("{path}: {e}")))?;
    TextureData::decode(&bytes)
}

fn spawn_texture_fetch(path: String, engine: SharedEngine) {
    spawn_local(async move {
        match fetch_texture(&path).await {
            Ok(texture) => {
                log::debug!("fetched {path} ({}x{})", texture.width, texture.height);
                engine.borrow_mut().set_texture(&texture);
            }
            Err(e) => log::warn!("{e}, keeping fallback texture"),
        }
    });
}

// ── Frame loop ───────────────────────────────────────────────────────────

fn request_animation_frame(window: &Window, callback: &Closure<dyn FnMut(f64)>) {
    if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

/// Update, render and reposition labels every animation frame. The loop
/// is never cancelled.
fn start_frame_loop(window: Window, engine: SharedEngine, labels: LabelElements) {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let win = window.clone();

    *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
        {
            let mut engine = engine.borrow_mut();
            let _ = engine.tick();
            match engine.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    engine.context.reconfigure();
                }
                Err(e) => log::error!("render error: {e:?}"),
            }
            sync_labels(&engine, &labels, win.device_pixel_ratio());
        }

        if let Some(cb) = next.borrow().as_ref() {
            request_animation_frame(&win, cb);
        }
    }));

    if let Some(cb) = callback.borrow().as_ref() {
        request_animation_frame(&window, cb);
    }
}
