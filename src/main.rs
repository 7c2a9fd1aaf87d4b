//! Dash Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent};

    use dash_runner::renderer::{RenderState, shapes, viewport_to_playfield};
    use dash_runner::sim::{Overlay, TextStyle};
    use dash_runner::{Game, Tuning, css_color};

    /// Game plus the browser-side pieces around it
    struct WebGame {
        game: Game,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Last score text written to the DOM
        shown_score: String,
        /// Title and body of the overlay currently in the DOM
        shown_overlay: Option<(String, String)>,
    }

    impl WebGame {
        /// Pointer position in canvas CSS pixels to playfield coordinates
        fn to_playfield(&self, x: i32, y: i32) -> glam::Vec2 {
            let size = (
                self.canvas.client_width().max(1) as u32,
                self.canvas.client_height().max(1) as u32,
            );
            let (px, py) = viewport_to_playfield(x as f32, y as f32, size);
            glam::Vec2::new(px, py)
        }

        fn render(&mut self) {
            let vertices = shapes::scene(&self.game.world);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror score text and overlay into the DOM
        fn update_hud(&mut self, document: &Document) {
            let world = &self.game.world;

            if world.score_text() != self.shown_score {
                self.shown_score = world.score_text().to_string();
                if let Some(el) = html_element(document, "hud-score") {
                    el.set_text_content(Some(&self.shown_score));
                    apply_text_style(&el, world.score_style());
                }
            }

            let wanted = world
                .overlay()
                .map(|o| (o.title.clone(), o.body.clone()));
            if wanted != self.shown_overlay {
                match world.overlay() {
                    Some(overlay) => show_overlay(document, overlay),
                    None => {
                        if let Some(el) = html_element(document, "overlay") {
                            let _ = el.set_attribute("class", "hidden");
                        }
                    }
                }
                self.shown_overlay = wanted;
            }
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn apply_text_style(el: &HtmlElement, style: &TextStyle) {
        let css = el.style();
        let _ = css.set_property("font-family", &style.font_family);
        let _ = css.set_property("font-size", &format!("{}px", style.font_size));
        let _ = css.set_property("color", &css_color(style.color));
        let _ = css.set_property("text-align", style.align.as_str());
        let _ = css.set_property(
            "line-height",
            &format!("{}px", style.font_size + style.line_spacing),
        );
        match style.wrap_width {
            Some(width) => {
                let _ = css.set_property("max-width", &format!("{}px", width));
                let _ = css.set_property("white-space", "pre-wrap");
            }
            None => {
                let _ = css.remove_property("max-width");
                let _ = css.set_property("white-space", "pre");
            }
        }
    }

    fn show_overlay(document: &Document, overlay: &Overlay) {
        let parts = [
            ("overlay-title", &overlay.title, &overlay.title_style),
            ("overlay-body", &overlay.body, &overlay.body_style),
            ("overlay-hint", &overlay.hint, &overlay.hint_style),
        ];
        for (id, text, style) in parts {
            if let Some(el) = html_element(document, id) {
                el.set_text_content(Some(text));
                apply_text_style(&el, style);
            }
        }

        if let Some(el) = html_element(document, "overlay") {
            // Center the text block on the panel, as a fraction of the playfield
            let css = el.style();
            let center = overlay.panel.center;
            let left = center.x / dash_runner::consts::PLAYFIELD_WIDTH * 100.0;
            let top = center.y / dash_runner::consts::PLAYFIELD_HEIGHT * 100.0;
            let _ = css.set_property("left", &format!("{}%", left));
            let _ = css.set_property("top", &format!("{}%", top));
            let _ = el.set_attribute("class", "");
        }
    }

    /// Tuning overrides from an inline `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty())
        else {
            return Tuning::default();
        };

        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning JSON: {}", e);
                Tuning::default()
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Dash Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(load_tuning(&document), seed);
        log::info!("Game initialized with seed: {}", seed);

        let web_game = Rc::new(RefCell::new(WebGame {
            game,
            render_state: None,
            canvas: canvas.clone(),
            shown_score: String::new(),
            shown_overlay: None,
        }));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        web_game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, web_game.clone())?;
        setup_window_handlers(web_game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(web_game);

        log::info!("Dash Runner running!");
        Ok(())
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        web_game: Rc<RefCell<WebGame>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Pointer down: start, and the origin of a swipe
        {
            let web_game = web_game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = web_game.borrow_mut();
                let pos = g.to_playfield(event.offset_x(), event.offset_y());
                g.game.input.pointer_down(pos);
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer move: swipe classification while pressed
        {
            let web_game = web_game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = web_game.borrow_mut();
                let pos = g.to_playfield(event.offset_x(), event.offset_y());
                g.game.input.pointer_move(pos, event.buttons() != 0);
            });
            canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer up anywhere ends the drag
        {
            let web_game = web_game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                web_game.borrow_mut().game.input.pointer_up();
            });
            for name in ["pointerup", "pointercancel"] {
                window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            }
            closure.forget();
        }

        // Keyboard
        {
            let web_game = web_game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if web_game.borrow_mut().game.input.key_down(&event.key()) {
                    // Keep Space and the arrows from scrolling the page
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                web_game.borrow_mut().game.input.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_window_handlers(web_game: Rc<RefCell<WebGame>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Window blur: key-ups will never arrive
        {
            let web_game = web_game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                web_game.borrow_mut().game.input.release_all();
                log::debug!("Input released (window blur)");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let mut g = web_game.borrow_mut();
                let (width, height) = fit_canvas(&window, &g.canvas);
                if let Some(ref mut render_state) = g.render_state {
                    render_state.resize(width, height);
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(web_game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(web_game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(web_game: Rc<RefCell<WebGame>>, time: f64) {
        {
            let mut g = web_game.borrow_mut();
            g.game.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(web_game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Dash Runner failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays for a while and reports its runs.
///
/// Usage: `dash-runner [tuning.json] [seconds]`
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use dash_runner::sim::RunPhase;
    use dash_runner::{Game, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dash Runner (native) starting...");
    log::info!("Native mode runs the autopilot headless - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {}", path))?;
            Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path))?
        }
        None => Tuning::default(),
    };
    let seconds: f64 = args
        .next()
        .map(|s| s.parse())
        .transpose()
        .context("duration must be a number of seconds")?
        .unwrap_or(120.0);

    let seed: u64 = rand::random();
    log::info!("Simulating {:.0}s with seed {}", seconds, seed);
    let mut game = Game::new(tuning, seed);
    game.input.key_down("i");

    const FRAME_MS: f64 = 1000.0 / 60.0;
    let mut scores = Vec::new();
    let mut now = 0.0;
    while now < seconds * 1000.0 {
        let was_running = game.phase() == RunPhase::Running;
        game.frame(now, FRAME_MS);
        if was_running && game.phase() == RunPhase::GameOver {
            scores.push(game.score());
        }
        now += FRAME_MS;
    }

    println!("Simulated {:.0}s with the autopilot", seconds);
    println!("Runs ended: {}", scores.len());
    if let Some(best) = scores.iter().max() {
        println!("Best score: {}", best);
    }
    if game.phase() == RunPhase::Running {
        println!(
            "Current run: score {} at speed {:.0}",
            game.score(),
            game.state.run.speed
        );
    }

    Ok(())
}
