//! Interactive host: the terminal is the surface and the keyboard the input.

use canvaswalk_common::{Color, Rect};
use canvaswalk_driver::{FixedRateClock, FrameHost, KeyEvent};
use canvaswalk_input::{InputLatch, KeyCode};
use canvaswalk_render::{CellSurface, SpriteSheet, Surface};
use crossterm::event::{
    self as ct, DisableFocusChange, EnableFocusChange, Event, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Print, ResetColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::collections::BTreeMap;
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// How long a key counts as held after a press on terminals that never
/// report releases. Key repeat refreshes it.
const TAP_HOLD: Duration = Duration::from_millis(150);

pub struct TerminalHost {
    clock: FixedRateClock,
    out: Stdout,
    attached: bool,
    closed: bool,
    reports_release: bool,
    tap_deadlines: BTreeMap<KeyCode, Duration>,
}

impl TerminalHost {
    pub fn new(interval: Duration) -> Self {
        Self {
            clock: FixedRateClock::new(interval),
            out: io::stdout(),
            attached: false,
            closed: false,
            reports_release: false,
            tap_deadlines: BTreeMap::new(),
        }
    }

    fn handle(&mut self, event: Event, latch: &mut InputLatch) {
        match event {
            Event::Key(key) => {
                if key.code == ct::KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    self.closed = true;
                    return;
                }
                let Some(code) = convert_key_code(key.code) else {
                    return;
                };
                let event = match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => KeyEvent::Press(code),
                    KeyEventKind::Release => KeyEvent::Release(code),
                };
                if !self.reports_release && matches!(event, KeyEvent::Press(_)) {
                    self.tap_deadlines.insert(code, self.clock.now() + TAP_HOLD);
                }
                event.apply(latch);
            }
            Event::FocusLost => {
                tracing::debug!("focus lost, releasing all keys");
                self.tap_deadlines.clear();
                latch.reset_all();
            }
            _ => {}
        }
    }

    fn enter_screen(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableFocusChange
        )?;
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.reports_release = true;
        }
        Ok(())
    }

    /// Undo a partial attach so a failed setup never leaves the terminal raw.
    fn restore_on_error(&mut self, setup: io::Result<()>) -> io::Result<()> {
        if setup.is_err() {
            let restored = self.detach_input();
            if let Err(e) = restored {
                tracing::warn!(error = %e, "failed to restore terminal after setup error");
            }
        }
        setup
    }

    fn expire_taps(&mut self, latch: &mut InputLatch) {
        let now = self.clock.now();
        self.tap_deadlines.retain(|code, deadline| {
            let live = *deadline > now;
            if !live {
                latch.release(*code);
            }
            live
        });
    }
}

impl FrameHost for TerminalHost {
    fn attach_input(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.attached = true;
        let setup = self.enter_screen();
        self.restore_on_error(setup)?;
        tracing::info!(reports_release = self.reports_release, "terminal input attached");
        Ok(())
    }

    /// Best effort: every restore step runs even if an earlier one fails, and
    /// the first failure is returned.
    fn detach_input(&mut self) -> io::Result<()> {
        if !self.attached {
            return Ok(());
        }
        self.attached = false;
        let popped = if self.reports_release {
            execute!(self.out, PopKeyboardEnhancementFlags)
        } else {
            Ok(())
        };
        self.reports_release = false;
        let screen = execute!(
            self.out,
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let raw = terminal::disable_raw_mode();
        popped.and(screen).and(raw)
    }

    fn pump_input(&mut self, latch: &mut InputLatch) -> io::Result<()> {
        if !self.attached {
            return Ok(());
        }
        while ct::poll(Duration::ZERO)? {
            let event = ct::read()?;
            self.handle(event, latch);
        }
        if !self.reports_release {
            self.expire_taps(latch);
        }
        Ok(())
    }

    fn next_frame(&mut self) -> io::Result<Option<Duration>> {
        if self.closed {
            return Ok(None);
        }
        Ok(Some(self.clock.wait_next()))
    }

    fn now(&self) -> Duration {
        self.clock.now()
    }
}

fn convert_key_code(code: ct::KeyCode) -> Option<KeyCode> {
    match code {
        ct::KeyCode::Esc => Some(KeyCode::ESCAPE),
        ct::KeyCode::Left => Some(KeyCode::ARROW_LEFT),
        ct::KeyCode::Right => Some(KeyCode::ARROW_RIGHT),
        ct::KeyCode::Up => Some(KeyCode::ARROW_UP),
        ct::KeyCode::Down => Some(KeyCode::ARROW_DOWN),
        ct::KeyCode::Char(' ') => Some(KeyCode::SPACE),
        ct::KeyCode::Char(c) => KeyCode::from_char(c),
        _ => None,
    }
}

fn convert_color(color: &Color) -> style::Color {
    match color.as_str() {
        "red" => style::Color::Red,
        "green" => style::Color::Green,
        "blue" => style::Color::Blue,
        "yellow" => style::Color::Yellow,
        "cyan" => style::Color::Cyan,
        "magenta" | "purple" => style::Color::Magenta,
        "black" => style::Color::DarkGrey,
        "grey" | "gray" => style::Color::Grey,
        _ => style::Color::White,
    }
}

/// A `CellSurface` flushed to the terminal on present.
pub struct TerminalSurface {
    cells: CellSurface,
    out: Stdout,
}

impl TerminalSurface {
    pub fn new(px_per_cell: f32) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            cells: CellSurface::new(usize::from(cols), usize::from(rows), px_per_cell),
            out: io::stdout(),
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        for row in 0..self.cells.rows() {
            let y = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.out, cursor::MoveTo(0, y))?;
            for cell in self.cells.row(row) {
                match &cell.color {
                    Some(color) => queue!(
                        self.out,
                        SetForegroundColor(convert_color(color)),
                        Print('█')
                    )?,
                    None => queue!(self.out, ResetColor, Print(cell.glyph))?,
                }
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self) {
        self.cells.clear();
    }

    fn fill_rect(&mut self, color: &Color, dst: Rect) {
        self.cells.fill_rect(color, dst);
    }

    fn draw_image(&mut self, sheet: &SpriteSheet, src: Rect, dst: Rect) {
        self.cells.draw_image(sheet, src, dst);
    }

    fn present(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to flush terminal frame");
        }
    }
}
