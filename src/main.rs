//! Frog Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent};

    use frog_dodge::renderer::SdfRenderState;
    use frog_dodge::{Game, Hud, Tuning};

    /// Score and status lines as DOM text
    struct DomHud {
        score_el: Option<Element>,
        status_el: Option<Element>,
    }

    impl Hud for DomHud {
        fn set_score(&mut self, score: u64) {
            if let Some(el) = &self.score_el {
                el.set_text_content(Some(&format!("Score: {}", score)));
            }
        }

        fn set_status(&mut self, status: &str) {
            if let Some(el) = &self.status_el {
                el.set_text_content(Some(status));
            }
        }
    }

    /// Game plus its GPU backend
    struct App {
        game: Game<DomHud>,
        render_state: Option<SdfRenderState>,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let playfield = self.game.playfield();
            let scene = self.game.frame(time);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(scene, playfield) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Frog Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load_or_default(canvas.get_attribute("data-tuning").as_deref());

        let hud = DomHud {
            score_el: document.get_element_by_id("score"),
            status_el: document.get_element_by_id("status"),
        };

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(tuning, seed, now_ms(), hud);
        // Attract-screen demo: `<canvas data-autopilot>` hands steering to the autopilot
        game.idle_mode = canvas.has_attribute("data-autopilot");
        if game.idle_mode {
            log::info!("Autopilot enabled");
        }
        let app = Rc::new(RefCell::new(App {
            game,
            render_state: None,
        }));

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SdfRenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Frog Dodge running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.game.key_down(&event.key(), now_ms()).is_some() {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-ups will never arrive for keys held at that moment
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use frog_dodge::{Game, Hud, Tuning};

    /// Simulated refresh rate
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop after two minutes of game time
    const MAX_FRAMES: u64 = 60 * 120;

    /// HUD that writes to the log
    #[derive(Default)]
    struct LogHud {
        score: u64,
    }

    impl Hud for LogHud {
        fn set_score(&mut self, score: u64) {
            if score != self.score {
                log::debug!("Score: {}", score);
                self.score = score;
            }
        }

        fn set_status(&mut self, status: &str) {
            if !status.is_empty() {
                log::info!("{}", status);
            }
        }
    }

    /// Play one session under the autopilot
    pub fn run(tuning: Tuning, seed: u64) {
        let mut game = Game::new(tuning, seed, 0.0, LogHud::default());
        game.idle_mode = true;

        let mut frames = 0;
        while game.state.is_alive() && frames < MAX_FRAMES {
            frames += 1;
            game.frame(frames as f64 * FRAME_MS);
        }

        log::info!(
            "Session over after {:.1}s: score {} ({} obstacles on field)",
            frames as f64 * FRAME_MS / 1000.0,
            game.hud().score,
            game.state.obstacles.len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use frog_dodge::Tuning;

    env_logger::init();
    log::info!("Frog Dodge (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` to play");

    let tuning = match std::env::var("FROG_DODGE_TUNING") {
        Ok(path) => Tuning::from_file(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }),
        Err(_) => Tuning::default(),
    };

    headless::run(tuning, rand::random());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
