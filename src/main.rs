//! Stillness entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent, Window};

    use stillness::consts::*;
    use stillness::platform::web::{
        PlatformError, Viewport, WindowNavigator, create_canvas, document, load_font,
        rasterize_label, size_canvas, window,
    };
    use stillness::renderer::SceneRenderState;
    use stillness::scene::{LabelSprite, font_load_query};
    use stillness::sim::FieldState;
    use stillness::{FrameDriver, FrameOutcome, StopHandle};

    type Driver = FrameDriver<SceneRenderState>;

    thread_local! {
        static STOP: RefCell<Option<StopHandle>> = const { RefCell::new(None) };
    }

    /// Stop the animation loop. The frame in flight finishes; no new one is scheduled.
    #[wasm_bindgen]
    pub fn stop_animation() {
        STOP.with(|stop| {
            if let Some(handle) = stop.borrow().as_ref() {
                handle.stop();
            }
        });
    }

    pub async fn run() -> Result<(), PlatformError> {
        log::info!("Stillness starting...");

        let window = window()?;
        let document = document(&window)?;
        let viewport = Viewport::of(&window);
        let canvas = create_canvas(&document, &viewport)?;

        // The label must be drawn with the real face, so nothing starts before it loads
        load_font(&document, &font_load_query()).await?;
        log::info!("Font loaded");

        let (layout, bitmap) = rasterize_label(&document, LABEL_TEXT)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(stillness::renderer::GpuError::from)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(stillness::renderer::GpuError::from)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let seed = js_sys::Date::now() as u64;
        let state = FieldState::new(seed);
        log::info!(
            "Field initialized with seed {}: {}",
            seed,
            state.config.to_log_string()
        );
        log::info!(
            "Label fades in over {} frames once the field settles",
            state.config.frames_to_full_reveal()
        );

        let (width, height) = viewport.buffer_size();
        let render_state = SceneRenderState::new(
            surface,
            &adapter,
            width,
            height,
            viewport.pixel_ratio,
            state.particles.len(),
            &bitmap,
        )
        .await?;

        let driver = FrameDriver::new(
            state,
            LabelSprite::from_layout(&layout),
            render_state,
            viewport.css_size(),
        );
        STOP.with(|stop| *stop.borrow_mut() = Some(driver.stop_handle()));
        let driver = Rc::new(RefCell::new(driver));

        setup_resize(&window, canvas.clone(), driver.clone());
        setup_input_handlers(&window, &canvas, driver.clone());

        request_animation_frame(driver);

        log::info!("Stillness running!");
        Ok(())
    }

    fn setup_resize(window: &Window, canvas: HtmlCanvasElement, driver: Rc<RefCell<Driver>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = Viewport::of(&window);
            size_canvas(&canvas, &viewport);
            let mut d = driver.borrow_mut();
            d.presenter_mut().set_pixel_ratio(viewport.pixel_ratio);
            d.resize(viewport.css_size(), viewport.buffer_size());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, driver: Rc<RefCell<Driver>>) {
        // Click anywhere: picks against the label sprite
        {
            let driver = driver.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                driver.borrow_mut().click(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    &mut WindowNavigator,
                );
            });
            let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Orbit drag starts on the canvas, continues anywhere in the window
        {
            let driver = driver.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                driver
                    .borrow_mut()
                    .pointer_down(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let driver = driver.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                driver.borrow_mut().pointer_move(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    canvas.client_height() as f32,
                );
            });
            let _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let driver = driver.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                driver.borrow_mut().pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                driver.borrow_mut().wheel(event.delta_y() as f32);
            });
            let _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(driver: Rc<RefCell<Driver>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; frame loop cannot continue");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(driver);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(driver: Rc<RefCell<Driver>>) {
        let outcome = driver.borrow_mut().frame();
        match outcome {
            FrameOutcome::Continue(_) => request_animation_frame(driver),
            FrameOutcome::Stopped => {
                let d = driver.borrow();
                log::info!("Animation stopped at frame {}", d.state().frame);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    if let Err(e) = wasm_app::run().await {
        log::error!("Stillness failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stillness::FrameDriver;
    use stillness::consts::LABEL_TEXT;
    use stillness::platform::headless::HeadlessPresenter;
    use stillness::scene::{LabelLayout, LabelSprite};
    use stillness::sim::{FieldState, RevealEvent};

    env_logger::init();
    log::info!("Stillness (native) starting...");
    log::info!("Native mode runs the field headless - run with `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let state = FieldState::new(seed);
    log::info!("Seed {}: {}", seed, state.config.to_log_string());
    log::info!(
        "Velocity half-life {} frames, label fades in over {} frames",
        state.config.frames_to_decay(0.5),
        state.config.frames_to_full_reveal()
    );

    let label = LabelSprite::from_layout(&LabelLayout::approximate(LABEL_TEXT));
    let mut driver = FrameDriver::new(state, label, HeadlessPresenter::default(), (1280.0, 720.0));
    let stop = driver.stop_handle();

    let mut settled_at = None;
    while let stillness::FrameOutcome::Continue(report) = driver.frame() {
        match report.event {
            Some(RevealEvent::Settled) => settled_at = Some(report.frame),
            Some(RevealEvent::FullyRevealed) => stop.stop(),
            None => {}
        }
    }

    let presented = driver.presenter().frames_presented;
    match settled_at {
        Some(frame) => println!(
            "Settled at frame {}, label fully visible after {} frames",
            frame, presented
        ),
        None => println!("Ran {} frames without settling", presented),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
