/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
//! Interactive viewer of the pipette arm
//!
//! The scene only changes through `Presenter::apply`, once per accepted
//! message. kiss3d reads input events only while it draws, so the window
//! itself is still redrawn on every loop iteration.
use clap::Parser;
use kiss3d::event::Key;
use pipette_arm::config::ViewerConfig;
use pipette_arm::viewer::Kiss3dEngine;
use pipette_arm::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author = "Takashi Ogura")]
#[command(version, propagate_version = true)]
#[command(about = "Interactive viewer of the 5-DOF pipette arm", long_about = None)]
struct Args {
    /// Viewer configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) -> anyhow::Result<()> {
    let mut log_config = simplelog::ConfigBuilder::new();
    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);
    log_config.add_filter_ignore_str("winit");
    log_config.add_filter_ignore_str("gfx");

    let log_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

/// Map a key to a message; number keys only move the selection
fn key_message(key: Key, selected: &mut JointId, controls: &ControlsView) -> Option<Message> {
    let index = match key {
        Key::Key1 => Some(0),
        Key::Key2 => Some(1),
        Key::Key3 => Some(2),
        Key::Key4 => Some(3),
        Key::Key5 => Some(4),
        _ => None,
    };
    if let Some(joint) = index.and_then(JointId::from_index) {
        *selected = joint;
        return None;
    }
    match key {
        Key::Left => Some(controls.slider(*selected).nudge(-1)),
        Key::Right => Some(controls.slider(*selected).nudge(1)),
        Key::Up => Some(controls.slider(*selected).nudge(10)),
        Key::Down => Some(controls.slider(*selected).nudge(-10)),
        Key::C => Some(controls.color.next()),
        Key::R => Some(Message::ResetRequested),
        _ => None,
    }
}

/// Keep the last good scene on screen when an update fails
fn apply_or_warn<E: RenderEngine>(
    presenter: &mut Presenter,
    engine: &mut E,
    state: &AppState,
) -> bool {
    match presenter.apply(engine, &state.snapshot()) {
        Ok(rendered) => rendered,
        Err(err) => {
            log::warn!("failed to update the 3D view: {}", err);
            false
        }
    }
}

fn hud(controls: &ControlsView, selected: JointId) -> String {
    let mut lines = vec![controls.color.to_string()];
    for slider in &controls.sliders {
        let marker = if slider.joint == selected { ">" } else { " " };
        lines.push(format!("{} {}", marker, slider));
    }
    lines.push(format!("[R] {}  [C] color  [1-5] joint", controls.reset_label));
    lines.join("\n")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose)?;

    let config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    log::trace!("{:#?}", config);

    let mut state = AppState::with_color(config.color_selection());
    let mut engine = Kiss3dEngine::new(&config.window.title);
    let mut presenter = Presenter::mount(
        &mut engine,
        config.window.size(),
        &config.scene,
        &state.snapshot(),
    );
    if let Viewport::Placeholder(message) = presenter.view() {
        eprintln!("{}", message);
        presenter.unmount(&mut engine)?;
        return Ok(());
    }

    let mut selected = JointId::Base;
    loop {
        let controls = ControlsView::new(&state);
        engine.set_hud(hud(&controls, selected));
        if !engine.run_frame() {
            break;
        }
        for key in engine.key_presses() {
            let controls = ControlsView::new(&state);
            if let Some(message) = key_message(key, &mut selected, &controls) {
                if state.update(message) {
                    apply_or_warn(&mut presenter, &mut engine, &state);
                }
            }
        }
        if engine.is_closed() {
            break;
        }
    }

    presenter.unmount(&mut engine)?;
    Ok(())
}
