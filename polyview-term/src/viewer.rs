/// Interactive viewer: an event-driven session plus its terminal shell
use std::io::{self, stdout, Write};
use std::path::PathBuf;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use polyview_core::{CameraControls, Scene};

use crate::capture::{write_png, CaptureError, SCREENSHOT_FILE};
use crate::render::{render_scaled, render_scene};

/// Degrees per orbit/roll key press.
const STEP: f32 = 5.0;

/// User-originated events the session consumes, one at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    Quit,
    CaptureRequested,
    Orbit { azimuth: f32, elevation: f32 },
    Roll(f32),
    ResetView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Exited,
}

/// The interactive state machine, free of any terminal concern so
/// tests can drive it synchronously. Capture-on-demand renders the
/// scene at full resolution and overwrites [`SCREENSHOT_FILE`].
pub struct ViewerSession {
    scene: Scene,
    state: SessionState,
    screenshot_dir: PathBuf,
}

impl ViewerSession {
    /// Session capturing into the working directory.
    pub fn new(scene: Scene) -> Self {
        Self::with_screenshot_dir(scene, PathBuf::from("."))
    }

    /// Session capturing into `dir`. The filename stays fixed.
    pub fn with_screenshot_dir(scene: Scene, dir: PathBuf) -> Self {
        Self {
            scene,
            state: SessionState::Running,
            screenshot_dir: dir,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn handle(&mut self, event: ViewerEvent) -> Result<(), CaptureError> {
        match event {
            ViewerEvent::Quit => self.state = SessionState::Exited,
            ViewerEvent::CaptureRequested => {
                let frame = render_scene(&self.scene);
                write_png(&frame, &self.screenshot_dir.join(SCREENSHOT_FILE))?;
            }
            ViewerEvent::Orbit { azimuth, elevation } => {
                let camera = self.scene.camera();
                let mut camera = camera.borrow_mut();
                camera.azimuth(azimuth);
                camera.elevation(elevation);
            }
            ViewerEvent::Roll(degrees) => {
                self.scene.camera().borrow_mut().roll(degrees);
            }
            ViewerEvent::ResetView => {
                if let Some(bounds) = self.scene.bounds() {
                    self.scene.camera().borrow_mut().reset_to_bounds(&bounds);
                }
            }
        }
        Ok(())
    }
}

/// Blocking terminal shell around a [`ViewerSession`]: raw mode plus
/// the alternate screen, redrawing the ASCII view after every event.
/// Capture results go to the status line, not the logger, while the
/// terminal is raw.
pub struct TerminalViewer {
    session: ViewerSession,
    status: String,
}

impl TerminalViewer {
    pub fn new(scene: Scene) -> Self {
        Self {
            session: ViewerSession::new(scene),
            status: String::new(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.event_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn event_loop(&mut self) -> io::Result<()> {
        self.draw()?;
        while self.session.state() == SessionState::Running {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                let Some(viewer_event) = map_key(code) else {
                    continue;
                };
                match self.session.handle(viewer_event) {
                    Ok(()) => {
                        if viewer_event == ViewerEvent::CaptureRequested {
                            self.status = format!("wrote {SCREENSHOT_FILE}");
                        }
                    }
                    Err(err) => self.status = format!("capture failed: {err}"),
                }
                self.draw()?;
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let frame = render_scaled(
            self.session.scene(),
            cols as u32,
            (rows as u32).saturating_sub(1).max(1),
        );

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        for row in frame.ascii_rows() {
            queue!(stdout, Print(row), Print("\r\n"))?;
        }
        queue!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "polyview | Arrows=Orbit E/R=Roll 0=Reset S=Screenshot Q=Quit {}",
                self.status
            )),
            ResetColor
        )?;
        stdout.flush()
    }
}

fn map_key(code: KeyCode) -> Option<ViewerEvent> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewerEvent::Quit),
        KeyCode::Left => Some(ViewerEvent::Orbit { azimuth: -STEP, elevation: 0.0 }),
        KeyCode::Right => Some(ViewerEvent::Orbit { azimuth: STEP, elevation: 0.0 }),
        KeyCode::Up => Some(ViewerEvent::Orbit { azimuth: 0.0, elevation: STEP }),
        KeyCode::Down => Some(ViewerEvent::Orbit { azimuth: 0.0, elevation: -STEP }),
        KeyCode::Char('e') => Some(ViewerEvent::Roll(STEP)),
        KeyCode::Char('r') => Some(ViewerEvent::Roll(-STEP)),
        KeyCode::Char('0') => Some(ViewerEvent::ResetView),
        KeyCode::Char('s') => Some(ViewerEvent::CaptureRequested),
        _ => None,
    }
}
