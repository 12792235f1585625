// Window, event loop and the per-frame update/draw cycle

use anyhow::Result;
use glam::Vec2;
use log::info;
use std::sync::Arc;
use winit::{
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::config::{Frontend, GameConfig};
use crate::engine::audio::LogAudioPlayer;
use crate::engine::game_loop::GameLoop;
use crate::engine::input::{Action, InputManager, MouseTracker};
use crate::engine::renderer::{scene_view_proj, CanvasBatch, FrameGeometry, MeshBatch, Renderer};
use crate::engine::scene::camera::BACKGROUND;
use crate::game::clock::FRAME_RATE;
use crate::game::XcGame;

const TITLE: &str = "Flight Club";

/// Everything the event loop owns between frames
struct App {
    window: Arc<Window>,
    renderer: Renderer,
    game: XcGame,
    game_loop: GameLoop,
    input: InputManager,
    mouse: MouseTracker,
    frontend: Frontend,
    canvas: CanvasBatch,
    mesh: MeshBatch,
    status: String,
}

impl App {
    /// Run queued actions and the updates due; false once quit was asked for
    fn update(&mut self) -> bool {
        let events: Vec<_> = self.input.drain().collect();
        for event in events {
            if event.action == Action::Quit {
                return false;
            }
            self.game.handle_action(event.action, event.pressed);
        }

        let steps = self.game_loop.begin_frame();
        let dt = self.game_loop.timestep();
        for _ in 0..steps {
            self.game.update(dt);
        }
        if self.mouse.is_dragging() && steps > 0 {
            self.game
                .orbit_camera(self.mouse.drag_delta(), dt * steps as f32);
        }
        true
    }

    fn draw(&mut self) -> Result<()> {
        self.canvas.clear();
        self.mesh.clear();

        let view_proj = match self.frontend {
            Frontend::Canvas => {
                self.game.render_scene(&mut self.canvas);
                None
            }
            Frontend::Mesh => {
                let frame = self.game.frame();
                self.mesh.add_queue(&frame.queue, frame.camera);
                Some(scene_view_proj(frame.camera))
            }
        };
        self.game.render_hud(&mut self.canvas);
        self.show_status();

        let geometry = FrameGeometry {
            background: BACKGROUND,
            scene: view_proj.map(|vp| (&self.mesh, vp)),
            canvas: &self.canvas,
        };
        self.renderer.render(&geometry)
    }

    /// The status line goes in the window title
    fn show_status(&mut self) {
        let status = self.canvas.status_line().unwrap_or_default();
        if status != self.status {
            self.status = status.to_string();
            self.window
                .set_title(&format!("{} - {}", TITLE, self.status));
        }
    }
}

pub fn run(config: GameConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let renderer = pollster::block_on(Renderer::new(window.clone()))?;
    let size = window.inner_size();
    let mut game = XcGame::new(
        size.width.max(1),
        size.height.max(1),
        config.rng(),
        Box::new(LogAudioPlayer::new()),
    );
    if config.fast_forward {
        game.toggle_fast_forward();
    }

    let mut app = App {
        window,
        renderer,
        game,
        game_loop: GameLoop::new(FRAME_RATE),
        input: InputManager::new(),
        mouse: MouseTracker::new(),
        frontend: config.frontend,
        canvas: CanvasBatch::new(),
        mesh: MeshBatch::new(),
        status: String::new(),
    };

    info!("Using the {:?} front-end", config.frontend);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    app.renderer.resize(physical_size);
                    app.game
                        .resize(physical_size.width.max(1), physical_size.height.max(1));
                }
                WindowEvent::Occluded(hidden) => {
                    if hidden {
                        app.game_loop.pause();
                    } else {
                        app.game_loop.resume();
                    }
                }
                WindowEvent::Focused(false) => {
                    // key-ups go elsewhere until focus comes back
                    app.input.release_all();
                    app.mouse.released();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    app.input.process_keyboard_event(&event);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.mouse
                        .moved(Vec2::new(position.x as f32, position.y as f32));
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => app.mouse.pressed(),
                    ElementState::Released => app.mouse.released(),
                },
                WindowEvent::RedrawRequested => {
                    if !app.update() {
                        info!("Quit requested, shutting down...");
                        elwt.exit();
                        return;
                    }
                    if let Err(e) = app.draw() {
                        log::error!("Render failed: {}", e);
                        elwt.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
