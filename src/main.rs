use std::time::{Duration, Instant};

use anyhow::Result;
use log::{error, trace};
use pollster::FutureExt as _;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod app;
mod bullet_time;
mod config;
mod entity;
mod pager;
mod renderer;
mod scene;
mod shapes;
mod window;

use app::App;
use config::Config;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_args();

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title(app::TITLE)
        .with_inner_size(LogicalSize::<u32> {
            width: 1280,
            height: 720,
        })
        .build(&event_loop)?;

    let mut last_render_inst = Instant::now();

    let mut app = App::new(window, config).block_on()?;

    event_loop.run(move |e, _, control_flow| {
        trace!("{:?}", e);

        match e {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => {
                    app.on_exit();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => app.on_resize(size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    app.on_resize(*new_inner_size)
                }
                WindowEvent::ModifiersChanged(modifiers) => app.on_modifiers_changed(modifiers),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(keycode),
                            ..
                        },
                    ..
                } => app.on_key_down(keycode),
                WindowEvent::MouseWheel { delta, .. } => app.on_mouse_scroll(delta),
                _ => (),
            },
            Event::MainEventsCleared => {
                let target_frame_interval = Duration::from_secs_f64(1.0 / 60.0);
                let elapsed_from_last_draw = last_render_inst.elapsed();
                if target_frame_interval > elapsed_from_last_draw {
                    let wait = target_frame_interval - elapsed_from_last_draw;
                    *control_flow = ControlFlow::WaitUntil(Instant::now() + wait);
                    return;
                }

                if let Err(e) = app.render() {
                    error!("{:#}", e);
                    app.on_exit();
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                last_render_inst = Instant::now();
                *control_flow = ControlFlow::Poll;
            }
            _ => (),
        }
    });
}
