//! Hat Runner entry point
//!
//! In the browser this runs the game loop on a canvas. Natively it plays a
//! short scripted run headless and prints the final snapshot as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use hat_runner::audio::AudioManager;
    use hat_runner::consts::*;
    use hat_runner::renderer::{self, CanvasPainter};
    use hat_runner::sim::{GameState, TickInput, tick};
    use hat_runner::{Settings, Viewport};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        painter: CanvasPainter,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                let events = tick(&mut self.state, &input);
                self.audio.handle_events(&events);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.action = false;
                self.input.pause = false;
            }
        }

        /// Render the current frame
        fn render(&self) {
            let shapes = renderer::build(&self.state.snapshot(), &self.settings);
            if let Err(e) = self.painter.paint(&shapes) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Hat Runner starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        // The world is laid out in CSS pixels of the canvas
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let viewport = Viewport::new(width as f32, height as f32).unwrap_or_else(|e| {
            log::warn!("{}; falling back to the default viewport", e);
            Viewport::default()
        });

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::classic(seed, viewport)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        state.max_lava_dots = settings.max_lava_dots();

        let game = Rc::new(RefCell::new(Game {
            state,
            painter: CanvasPainter::new(&canvas)?,
            audio: AudioManager::new(&settings),
            settings,
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
        }));

        setup_input_handlers(&window, &canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Hat Runner running! Click to start.");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Click toggles pause
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.pause = true;
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    " " | "Spacebar" => {
                        if !event.repeat() {
                            g.audio.resume();
                            g.input.action = true;
                        }
                    }
                    _ => return,
                }
                // Keep the page from scrolling
                event.prevent_default();
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Ticks in the headless demo (20 seconds of play)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICKS: u32 = 1200;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use hat_runner::renderer;
    use hat_runner::sim::{GameState, TickInput, tick};
    use hat_runner::{Settings, Viewport};

    env_logger::init();
    log::info!("Hat Runner (native) starting headless demo...");

    let settings = Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut state = GameState::classic(seed, Viewport::default())?;
    state.max_lava_dots = settings.max_lava_dots();

    // Click to start, then run right and hop every 3/4 second
    for i in 0..DEMO_TICKS {
        let input = TickInput {
            left: false,
            right: true,
            action: i % 45 == 44,
            pause: i == 0,
        };
        for event in tick(&mut state, &input) {
            log::info!("tick {}: {:?}", state.time_ticks, event);
        }
        if state.is_frozen() {
            break;
        }
    }

    let snapshot = state.snapshot();
    let shapes = renderer::build(&snapshot, &settings);
    log::info!(
        "Demo finished: {:?}, score {}, lives {}, {} shapes in the last frame",
        snapshot.phase,
        snapshot.score,
        snapshot.lives,
        shapes.len()
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
