//! Arcade Trio entry point
//!
//! Web: picks a game from the URL hash, wires DOM input into the shared
//! input state and drives the controller from `requestAnimationFrame`.
//! Native: runs a headless autopilot demo of one game and logs the HUD.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use arcade_trio::carpet::CarpetState;
    use arcade_trio::consts::SIM_DT;
    use arcade_trio::controller::Controller;
    use arcade_trio::guard::GuardState;
    use arcade_trio::persistence::{LocalStorageStore, MemoryStore, ScoreStore};
    use arcade_trio::platform::{FrameClock, InputSource, InputState, Key, RawEvent, drive};
    use arcade_trio::renderer::{CanvasRenderer, Renderer, Scene, compose};
    use arcade_trio::runner::{RunnerConfig, RunnerState};
    use arcade_trio::tuning::{CarpetTuning, Course, GuardTuning};

    type Store = Box<dyn ScoreStore>;

    /// One game running in the page
    struct Session<G: Scene> {
        controller: Controller<G, Store>,
        clock: FrameClock,
        input: InputState,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        /// An animation frame is queued
        looping: bool,
    }

    impl<G: Scene> Session<G> {
        fn render(&mut self) {
            if let Err(e) = self.renderer.present(&compose(&self.controller)) {
                log::warn!("Render error: {}", e);
            }
        }

        /// CSS pixel offset inside the canvas to logical coordinates
        fn to_logical(&self, css_x: f32, css_y: f32) -> Vec2 {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()) as f32;
            self.renderer
                .viewport()
                .to_logical(Vec2::new(css_x, css_y) * dpr)
        }

        fn touch_point(&self, event: &TouchEvent) -> Option<Vec2> {
            let touch = event.touches().get(0)?;
            let rect = self.canvas.get_bounding_client_rect();
            let x = touch.client_x() as f32 - rect.left() as f32;
            let y = touch.client_y() as f32 - rect.top() as f32;
            Some(self.to_logical(x, y))
        }

        fn fit_canvas(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            self.renderer.resize(width.max(1), height.max(1));
        }
    }

    type Shared<G> = Rc<RefCell<Session<G>>>;

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    fn open_store() -> Store {
        match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; high scores will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
        }

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let hash = window.location().hash().unwrap_or_default();
        log::info!("Arcade Trio starting (hash {:?}, seed {})", hash, seed);

        match hash.trim_start_matches('#') {
            "ice" => launch::<RunnerState>(RunnerConfig::on(Course::Ice), canvas, seed),
            "carpet" => launch::<CarpetState>(CarpetTuning::default(), canvas, seed),
            "guard" => launch::<GuardState>(GuardTuning::default(), canvas, seed),
            _ => launch::<RunnerState>(RunnerConfig::on(Course::Roller), canvas, seed),
        }
    }

    fn launch<G>(tuning: G::Tuning, canvas: HtmlCanvasElement, seed: u64) -> Result<(), JsValue>
    where
        G: Scene + 'static,
        G::Tuning: 'static,
    {
        let logical = G::logical(&tuning);
        let renderer = CanvasRenderer::new(canvas.clone(), logical)
            .map_err(|e| js_err(&e.to_string()))?;
        let session = Session {
            controller: Controller::new(tuning, open_store(), seed),
            clock: FrameClock::new(),
            input: InputState::new(logical.x),
            renderer,
            canvas: canvas.clone(),
            looping: false,
        };
        let app: Shared<G> = Rc::new(RefCell::new(session));
        {
            let mut s = app.borrow_mut();
            s.fit_canvas();
            s.render();
        }

        setup_keyboard(app.clone())?;
        setup_pointer(&canvas, app.clone())?;
        setup_touch(&canvas, app.clone())?;
        setup_auto_pause(app.clone())?;
        setup_resize(app)?;

        log::info!("{} ready", G::NAME);
        Ok(())
    }

    /// Feed an event and make sure it gets processed
    fn handle<G: Scene + 'static>(app: &Shared<G>, event: RawEvent) {
        app.borrow_mut().input.handle(event);
        kick(app);
    }

    /// Outside Playing no frames are scheduled, so run one step here to let
    /// start, resume and retry inputs land; restart the loop if needed
    fn kick<G: Scene + 'static>(app: &Shared<G>) {
        let start_loop = {
            let mut guard = app.borrow_mut();
            let s = &mut *guard;
            if s.looping {
                false
            } else {
                let snapshot = s.input.sample();
                s.controller.frame(&snapshot, SIM_DT);
                s.render();
                if s.controller.should_schedule() {
                    s.clock.reset();
                    s.looping = true;
                    true
                } else {
                    false
                }
            }
        };
        if start_loop {
            request_animation_frame(app.clone());
        }
    }

    fn request_animation_frame<G: Scene + 'static>(app: Shared<G>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, stopping the loop");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
        }
        closure.forget();
    }

    fn game_loop<G: Scene + 'static>(app: Shared<G>, time: f64) {
        let keep_going = {
            let mut guard = app.borrow_mut();
            let s = &mut *guard;
            let dt = s.clock.delta(time);
            drive(&mut s.controller, &mut s.clock, &mut s.input, dt);
            s.render();
            let keep = s.controller.should_schedule();
            s.looping = keep;
            keep
        };
        if keep_going {
            request_animation_frame(app);
        }
    }

    fn setup_keyboard<G: Scene + 'static>(app: Shared<G>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(&event.code());
                if key != Key::Other {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
                if !event.repeat() {
                    handle(&app, RawEvent::KeyDown(key));
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                handle(&app, RawEvent::KeyUp(Key::from_code(&event.code())));
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_pointer<G: Scene + 'static>(
        canvas: &HtmlCanvasElement,
        app: Shared<G>,
    ) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = app
                    .borrow()
                    .to_logical(event.offset_x() as f32, event.offset_y() as f32);
                handle(&app, RawEvent::PointerMove(p));
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = app
                    .borrow()
                    .to_logical(event.offset_x() as f32, event.offset_y() as f32);
                handle(&app, RawEvent::PointerDown(p));
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                handle(&app, RawEvent::PointerUp);
            });
            // Released anywhere, not just over the canvas
            let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_touch<G: Scene + 'static>(
        canvas: &HtmlCanvasElement,
        app: Shared<G>,
    ) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let point = app.borrow().touch_point(&event);
                if let Some(p) = point {
                    handle(&app, RawEvent::TouchStart(p));
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let point = app.borrow().touch_point(&event);
                if let Some(p) = point {
                    handle(&app, RawEvent::TouchMove(p));
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        for name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                handle(&app, RawEvent::TouchEnd);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Pause on tab hide and window blur; resuming needs explicit input
    fn setup_auto_pause<G: Scene + 'static>(app: Shared<G>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        fn lose_focus<G: Scene>(app: &Shared<G>, why: &str) {
            let mut s = app.borrow_mut();
            s.input.release_all();
            s.controller.focus_lost();
            s.render();
            log::info!("Focus lost ({})", why);
        }

        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    lose_focus(&app, "tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                lose_focus(&app, "window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize<G: Scene + 'static>(app: Shared<G>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut s = app.borrow_mut();
            s.fit_canvas();
            s.render();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use std::f32::consts::TAU;

    use arcade_trio::carpet::CarpetState;
    use arcade_trio::consts::SIM_DT;
    use arcade_trio::controller::Controller;
    use arcade_trio::guard::GuardState;
    use arcade_trio::persistence::MemoryStore;
    use arcade_trio::platform::input::FnInput;
    use arcade_trio::platform::{FrameClock, InputSnapshot, InputSource, drive};
    use arcade_trio::renderer::{LogRenderer, Renderer, Scene, compose};
    use arcade_trio::runner::{RunnerConfig, RunnerState};
    use arcade_trio::tuning::{self, CarpetTuning, Course, GuardTuning, RunnerTuning};

    /// Command line: `arcade-trio [runner|ice|carpet|guard] [seed] [tuning.json]`
    pub struct Args {
        pub game: String,
        pub seed: u64,
        pub tuning: Option<String>,
    }

    impl Args {
        pub fn parse(mut args: impl Iterator<Item = String>) -> Self {
            let game = args.next().unwrap_or_else(|| "runner".to_string());
            let seed = match args.next().map(|s| s.parse::<u64>()) {
                Some(Ok(seed)) => seed,
                Some(Err(e)) => {
                    log::warn!("Bad seed ({}), using 1", e);
                    1
                }
                None => 1,
            };
            Self {
                game,
                seed,
                tuning: args.next(),
            }
        }
    }

    /// Read a tuning override file, or fall back to the defaults
    fn load_tuning<T>(path: Option<&str>) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let Some(path) = path else {
            return T::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                T::default()
            }),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                T::default()
            }
        }
    }

    /// Simulate up to `seconds` of 60 Hz frames and report the result
    fn run<G: Scene>(tuning: G::Tuning, seed: u64, input: &mut dyn InputSource, seconds: u32) {
        let mut controller: Controller<G, MemoryStore> =
            Controller::new(tuning, MemoryStore::new(), seed);
        if let Err(e) = controller.start() {
            log::error!("{}", e);
            return;
        }
        let mut clock = FrameClock::new();
        let mut renderer = LogRenderer::new(60);

        for _ in 0..seconds * 60 {
            drive(&mut controller, &mut clock, input, SIM_DT);
            if let Err(e) = renderer.present(&compose(&controller)) {
                log::warn!("Render error: {}", e);
            }
            if !controller.should_schedule() {
                break;
            }
        }

        match controller.last_result() {
            Some(r) => log::info!(
                "{} finished: {:?}, score {} after {} frames",
                G::NAME,
                r.outcome,
                r.score,
                renderer.frames()
            ),
            None => log::info!(
                "{} still running after {}s, score {}",
                G::NAME,
                seconds,
                controller.run().map_or(0, |r| arcade_trio::Game::score(r))
            ),
        }
    }

    pub fn main(args: Args) {
        let tuning_path = args.tuning.as_deref();
        let mut ticks = 0u32;
        match args.game.as_str() {
            "runner" | "ice" => {
                let course = if args.game == "ice" {
                    Course::Ice
                } else {
                    Course::Roller
                };
                let config = RunnerConfig {
                    course,
                    tuning: load_tuning::<RunnerTuning>(tuning_path),
                };
                // Weave: short taps each way
                let mut input = FnInput(move || {
                    ticks += 1;
                    let phase = ticks % 90;
                    InputSnapshot {
                        left: phase < 20,
                        right: (45..65).contains(&phase),
                        ..Default::default()
                    }
                });
                run::<RunnerState>(config, args.seed, &mut input, 60);
            }
            "carpet" => {
                let tuning = load_tuning::<CarpetTuning>(tuning_path);
                let mut input = FnInput(move || {
                    ticks += 1;
                    InputSnapshot {
                        up: ticks % 40 < 15,
                        action: ticks % 600 == 0,
                        ..Default::default()
                    }
                });
                run::<CarpetState>(tuning, args.seed, &mut input, 60);
            }
            "guard" => {
                let tuning = load_tuning::<GuardTuning>(tuning_path);
                let center = Vec2::new(tuning.width, tuning.height) / 2.0;
                // Sweep the gaze around and glare constantly
                let mut input = FnInput(move || {
                    ticks += 1;
                    let angle = ticks as f32 * 0.05 % TAU;
                    InputSnapshot {
                        pointer: Some(center + Vec2::new(angle.cos(), angle.sin()) * 100.0),
                        action: ticks % 18 == 0,
                        ..Default::default()
                    }
                });
                run::<GuardState>(tuning, args.seed, &mut input, 70);
            }
            other => {
                log::error!("Unknown game {:?}; try runner, ice, carpet or guard", other);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade Trio (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    demo::main(demo::Args::parse(std::env::args().skip(1)));
}
