//! Frame-driven game loop.
//!
//! A [`Session`] is stepped once per host frame. It turns pointer input
//! into commits, plays the staged flip reveal and keeps the renderer's
//! state buffer up to date. Everything runs on the caller's thread.

use serde::Serialize;
use web_time::Instant;

use crate::animation::{DisplayBoard, FlipSequence};
use crate::config::{ConfigError, LayoutConfig};
use crate::controller::{CommitOutcome, TurnController};
use crate::input::{BoardLayout, EdgeTrigger};
use crate::types::{GameSnapshot, MoveReport, Outcome};

/// Host services consumed by [`Session::run`].
pub trait FrameHost {
    fn is_button_pressing(&self) -> bool;
    /// Pointer position in playfield pixels.
    fn cursor_pos(&self) -> (f32, f32);
    fn set_board_state_buffer(&mut self, buffer: &[u8]);
    fn log(&mut self, line: &str);
    /// Suspends until the next frame.
    fn next_frame(&mut self);
}

/// Input sampled for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub pressed: bool,
    pub cursor: (f32, f32),
}

/// What one frame changed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FrameResult {
    /// The state buffer differs from the previous frame.
    pub changed: bool,
    /// Move committed this frame, if any.
    pub report: Option<MoveReport>,
    /// False once the game is over and the last flip has been shown.
    pub running: bool,
}

pub struct Session {
    controller: TurnController,
    layout: BoardLayout,
    frames_per_wave: u32,
    button: EdgeTrigger<bool>,
    display: DisplayBoard,
    flipping: Option<FlipSequence>,
    started: Instant,
    log: Vec<String>,
}

impl Session {
    pub fn new(config: &LayoutConfig) -> Result<Self, ConfigError> {
        Self::with_controller(TurnController::new(), config)
    }

    pub fn with_controller(
        controller: TurnController,
        config: &LayoutConfig,
    ) -> Result<Self, ConfigError> {
        let layout = config.validate()?;
        let display = DisplayBoard::from_board(controller.board());
        let mut session = Self {
            controller,
            layout,
            frames_per_wave: config.frames_per_wave,
            button: EdgeTrigger::new(false),
            display,
            flipping: None,
            started: Instant::now(),
            log: Vec::new(),
        };
        session.log.push(format!("board margin: {}", layout.margin()));
        session.log_status();
        Ok(session)
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn display(&self) -> &DisplayBoard {
        &self.display
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.controller.snapshot()
    }

    /// True while a committed move's flips are still being revealed.
    pub fn is_flipping(&self) -> bool {
        self.flipping.is_some()
    }

    pub fn is_running(&self) -> bool {
        !(self.controller.is_finished() && self.flipping.is_none())
    }

    /// Seconds since the session started; used as flip timestamps.
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Renderer buffer for the current display state.
    pub fn state_buffer(&self) -> Vec<u8> {
        self.display.to_buffer()
    }

    /// Drains pending status lines.
    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }

    /// Runs one frame. At most one move is committed per frame, and clicks
    /// arriving while flips are still being revealed are dropped.
    pub fn frame(&mut self, input: FrameInput, now: f32) -> FrameResult {
        let clicked = self.button.rising(input.pressed);

        if self.flipping.is_some() {
            let changed = self.advance_flips(now);
            return FrameResult {
                changed,
                report: None,
                running: self.is_running(),
            };
        }

        let mut result = FrameResult {
            running: self.is_running(),
            ..FrameResult::default()
        };
        if !clicked {
            return result;
        }
        let Some((x, y)) = self.layout.cell_at_pixel(input.cursor.0, input.cursor.1) else {
            return result;
        };

        if let CommitOutcome::Placed(placement) = self.controller.commit(x, y) {
            self.display.show_placement(&placement.capture);
            let mut sequence = FlipSequence::new(&placement.capture, self.frames_per_wave);
            if self.frames_per_wave == 0 {
                while let Some(wave) = sequence.tick() {
                    self.display.reveal(sequence.color(), &wave.cells, now);
                }
            } else {
                self.flipping = Some(sequence);
                self.advance_flips(now);
            }
            for color in &placement.passed {
                self.log.push(format!("{color} pass"));
            }
            self.log_status();
            result.changed = true;
            result.report = Some(placement.report());
            result.running = self.is_running();
        }
        result
    }

    /// Drives the session with `host` until the game is over. Returns the
    /// final outcome.
    pub fn run<H: FrameHost>(&mut self, host: &mut H) -> Option<Outcome> {
        host.set_board_state_buffer(&self.state_buffer());
        self.flush_log(host);

        while self.is_running() {
            let input = FrameInput {
                pressed: host.is_button_pressing(),
                cursor: host.cursor_pos(),
            };
            let result = self.frame(input, self.elapsed());
            self.flush_log(host);
            if result.changed {
                host.set_board_state_buffer(&self.state_buffer());
            }
            if !result.running {
                break;
            }
            host.next_frame();
        }

        self.controller.outcome()
    }

    fn advance_flips(&mut self, now: f32) -> bool {
        let Some(sequence) = self.flipping.as_mut() else {
            return false;
        };
        let wave = sequence.tick();
        let changed = match &wave {
            Some(wave) => {
                self.display.reveal(sequence.color(), &wave.cells, now);
                true
            }
            None => false,
        };
        if sequence.is_complete() {
            self.flipping = None;
        }
        changed
    }

    fn log_status(&mut self) {
        self.log.extend(self.controller.status_lines());
    }

    fn flush_log<H: FrameHost>(&mut self, host: &mut H) {
        for line in self.take_log() {
            host.log(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::board::Board;
    use crate::buffer;
    use crate::types::{Cell, Color, Phase, Position};

    fn instant_config() -> LayoutConfig {
        LayoutConfig {
            frames_per_wave: 0,
            ..LayoutConfig::default()
        }
    }

    fn click_at(session: &Session, x: i32, y: i32) -> FrameInput {
        FrameInput {
            pressed: true,
            cursor: session.layout().cell_center(x, y),
        }
    }

    fn release() -> FrameInput {
        FrameInput::default()
    }

    /// Plays a scripted list of clicks, releasing the button between them.
    struct ScriptedHost {
        frames: VecDeque<FrameInput>,
        current: FrameInput,
        buffers: Vec<Vec<u8>>,
        lines: Vec<String>,
        frame_count: usize,
    }

    impl ScriptedHost {
        fn new(layout: &BoardLayout, clicks: &[(i32, i32)]) -> Self {
            let mut frames = VecDeque::new();
            for &(x, y) in clicks {
                frames.push_back(FrameInput {
                    pressed: true,
                    cursor: layout.cell_center(x, y),
                });
                frames.push_back(FrameInput::default());
            }
            Self {
                frames,
                current: FrameInput::default(),
                buffers: Vec::new(),
                lines: Vec::new(),
                frame_count: 0,
            }
        }
    }

    impl FrameHost for ScriptedHost {
        fn is_button_pressing(&self) -> bool {
            self.current.pressed
        }

        fn cursor_pos(&self) -> (f32, f32) {
            self.current.cursor
        }

        fn set_board_state_buffer(&mut self, buffer: &[u8]) {
            self.buffers.push(buffer.to_vec());
        }

        fn log(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }

        fn next_frame(&mut self) {
            self.frame_count += 1;
            assert!(self.frame_count < 1000, "session did not finish");
            self.current = self.frames.pop_front().unwrap_or_default();
        }
    }

    #[test]
    fn click_commits_once_per_press() {
        let mut session = Session::new(&instant_config()).unwrap();

        let first = session.frame(click_at(&session, 3, 2), 0.0);
        assert!(first.changed);
        assert_eq!(first.report.as_ref().map(|r| r.position), Some(Position::new(3, 2)));

        // still held: no second commit
        let held = session.frame(click_at(&session, 2, 2), 0.1);
        assert_eq!(held, FrameResult { changed: false, report: None, running: true });
        assert_eq!(session.controller().phase(), Phase::AwaitingMove(Color::Black));
    }

    #[test]
    fn clicks_outside_grid_or_on_illegal_cells_are_ignored() {
        let mut session = Session::new(&instant_config()).unwrap();

        let outside = session.frame(FrameInput { pressed: true, cursor: (5.0, 5.0) }, 0.0);
        session.frame(release(), 0.0);
        let illegal = session.frame(click_at(&session, 0, 0), 0.0);

        assert!(!outside.changed && !illegal.changed);
        assert_eq!(*session.controller().board(), Board::new());
    }

    #[test]
    fn instant_flips_reach_the_buffer_immediately() {
        let mut session = Session::new(&instant_config()).unwrap();

        session.frame(click_at(&session, 3, 2), 0.5);

        let cells = buffer::decode_cells(&session.state_buffer()).unwrap();
        assert_eq!(&cells, session.controller().board().cells());
        assert_eq!(buffer::flip_started_at(&session.state_buffer(), 3 * 8 + 3), Some(0.5));
    }

    #[test]
    fn staged_flips_block_input_until_done() {
        let config = LayoutConfig {
            frames_per_wave: 2,
            ..LayoutConfig::default()
        };
        let board = Board::from_rows(
            "
            _BBW____
            B_______
            W_______
            ________
            ________
            ________
            ___WB___
            ___BW___
            ",
        )
        .unwrap();
        let controller = TurnController::with_board(board, Color::White);
        let mut session = Session::with_controller(controller, &config).unwrap();

        let commit = session.frame(click_at(&session, 0, 0), 1.0);
        assert!(commit.changed);
        assert!(session.is_flipping());
        // first wave shown, second still pending
        assert_eq!(session.display().cell(Position::new(1, 0)), Some(Cell::Occupied(Color::White)));
        assert_eq!(session.display().cell(Position::new(2, 0)), Some(Cell::Occupied(Color::Black)));

        session.frame(release(), 1.1);
        let blocked = session.frame(click_at(&session, 2, 7), 1.2);
        assert!(blocked.report.is_none());

        let second = session.frame(release(), 1.3);
        assert!(second.changed);
        assert_eq!(session.display().cell(Position::new(2, 0)), Some(Cell::Occupied(Color::White)));
        assert_eq!(session.display().flip_started(Position::new(2, 0)), Some(1.3));

        session.frame(release(), 1.4);
        session.frame(release(), 1.5);
        assert!(!session.is_flipping());
        assert_eq!(session.display().flip_started(Position::new(1, 0)), Some(1.0));
        assert_eq!(session.controller().phase(), Phase::AwaitingMove(Color::Black));
    }

    #[test]
    fn run_exits_when_game_is_over() {
        let board = Board::from_rows(
            "
            _BW_____
            ________
            ________
            ________
            ________
            ________
            ________
            WB______
            ",
        )
        .unwrap();
        let controller = TurnController::with_board(board, Color::White);
        let mut session = Session::with_controller(controller, &instant_config()).unwrap();
        let mut host = ScriptedHost::new(session.layout(), &[(5, 5), (0, 0), (2, 7)]);

        let outcome = session.run(&mut host);

        assert_eq!(outcome, Some(Outcome::Winner(Color::White)));
        assert!(!session.is_running());
        assert!(host.lines.iter().any(|l| l == "Game finished"));
        let passes: Vec<&str> = host
            .lines
            .iter()
            .map(String::as_str)
            .filter(|l| l.ends_with(" pass"))
            .collect();
        assert_eq!(passes, vec!["black pass", "black pass", "white pass"]);
        let white_pass = host.lines.iter().position(|l| l == "white pass");
        let finished = host.lines.iter().position(|l| l == "Game finished");
        assert!(white_pass < finished);
        assert_eq!(host.lines.last().map(String::as_str), Some("white win (white 6 black 0)"));
        let last = host.buffers.last().unwrap();
        assert_eq!(&buffer::decode_cells(last).unwrap(), session.controller().board().cells());
    }

    #[test]
    fn startup_log_has_margin_and_phase() {
        let mut session = Session::new(&LayoutConfig::default()).unwrap();
        let lines = session.take_log();

        assert!(lines[0].starts_with("board margin: 52.8"));
        assert_eq!(lines.last().map(String::as_str), Some("white phase"));
        assert!(session.take_log().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LayoutConfig {
            render_size: -1.0,
            ..LayoutConfig::default()
        };

        assert!(matches!(Session::new(&config), Err(ConfigError::RenderSize(_))));
    }
}
