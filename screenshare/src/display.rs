//! Terminal render surface using ratatui-image.
//!
//! Automatically detects the best terminal graphics protocol (Sixel,
//! Kitty, iTerm2, halfblocks) unless one is forced in the config. The
//! alternate screen is entered on the first frame and left again on
//! `destroy` or drop, so an idle receiver leaves the shell usable.

use std::io::{self, Stdout};
use std::time::Duration;

use image::{DynamicImage, RgbImage};
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::widgets::Block;
use ratatui::Terminal;
use ratatui_image::StatefulImage;
use ratatui_image::picker::{Picker, ProtocolType};
use tracing::{info, warn};

use screenshare_core::{Key, RenderSurface, ShareError, SurfaceInput};

type Backend = CrosstermBackend<Stdout>;

/// Create a Picker by querying terminal capabilities.
///
/// Must run before raw mode is enabled.
pub fn create_picker(forced: Option<&str>) -> Picker {
    if let Some(name) = forced {
        match parse_protocol(name) {
            Some(proto) => {
                let mut picker = Picker::halfblocks();
                picker.set_protocol_type(proto);
                info!("graphics: forced {proto:?}");
                return picker;
            }
            None => warn!("unknown graphics protocol '{name}', using auto-detect"),
        }
    }

    match Picker::from_query_stdio() {
        Ok(picker) => {
            info!("graphics: detected {:?}", picker.protocol_type());
            picker
        }
        Err(_) => {
            info!("graphics: terminal query failed, using halfblocks");
            Picker::halfblocks()
        }
    }
}

pub fn parse_protocol(name: &str) -> Option<ProtocolType> {
    match name.to_ascii_lowercase().as_str() {
        "sixel" => Some(ProtocolType::Sixel),
        "kitty" => Some(ProtocolType::Kitty),
        "iterm2" | "iterm" => Some(ProtocolType::Iterm2),
        "halfblocks" | "half" => Some(ProtocolType::Halfblocks),
        _ => None,
    }
}

/// Map a terminal key press onto a surface input.
pub fn map_key_event(code: KeyCode, modifiers: KeyModifiers) -> Option<SurfaceInput> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SurfaceInput::Interrupt)
        }
        KeyCode::Char(c) => Some(SurfaceInput::Key(Key::Char(c.to_ascii_lowercase()))),
        KeyCode::Esc => Some(SurfaceInput::Key(Key::Escape)),
        _ => None,
    }
}

pub struct TerminalSurface {
    picker: Picker,
    terminal: Option<Terminal<Backend>>,
    fullscreen: bool,
    title: String,
}

impl TerminalSurface {
    pub fn new(title: impl Into<String>, forced_graphics: Option<&str>) -> Self {
        Self {
            picker: create_picker(forced_graphics),
            terminal: None,
            fullscreen: false,
            title: title.into(),
        }
    }

    fn terminal(&mut self) -> Result<&mut Terminal<Backend>, ShareError> {
        if self.terminal.is_none() {
            self.terminal = Some(open_terminal().map_err(display_error)?);
        }
        self.terminal
            .as_mut()
            .ok_or_else(|| ShareError::Display("terminal unavailable".into()))
    }
}

fn open_terminal() -> io::Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn display_error(e: io::Error) -> ShareError {
    ShareError::Display(e.to_string())
}

impl RenderSurface for TerminalSurface {
    fn show(&mut self, frame: &RgbImage) -> Result<(), ShareError> {
        let mut protocol = self
            .picker
            .new_resize_protocol(DynamicImage::ImageRgb8(frame.clone()));
        let fullscreen = self.fullscreen;
        let title = format!(" {} ({}x{}) ", self.title, frame.width(), frame.height());

        let terminal = self.terminal()?;
        terminal
            .draw(|f| {
                let area = f.area();
                let image_area = if fullscreen {
                    area
                } else {
                    let block = Block::bordered().title(title.as_str());
                    let inner = block.inner(area);
                    f.render_widget(block, area);
                    inner
                };
                f.render_stateful_widget(StatefulImage::default(), image_area, &mut protocol);
            })
            .map_err(display_error)?;
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        if self.fullscreen != fullscreen {
            if let Some(terminal) = self.terminal.as_mut() {
                // Drop the border on the next draw.
                if let Err(e) = terminal.clear() {
                    warn!("terminal clear failed: {e}");
                }
            }
        }
        self.fullscreen = fullscreen;
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<SurfaceInput>, ShareError> {
        if self.terminal.is_none() {
            return Ok(None);
        }
        if !event::poll(timeout).map_err(display_error)? {
            return Ok(None);
        }
        match event::read().map_err(display_error)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(map_key_event(key.code, key.modifiers))
            }
            _ => Ok(None),
        }
    }

    fn destroy(&mut self) {
        let Some(mut terminal) = self.terminal.take() else {
            return;
        };
        if let Err(e) = restore_terminal(&mut terminal) {
            warn!("terminal restore failed: {e}");
        }
    }

    fn is_open(&self) -> bool {
        self.terminal.is_some()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}
