//! Program runtime
//!
//! Owns the application state value and drives it: read one event, run the
//! transition, run any deferred work it returned to completion, then redraw.
//! Transitions consume the old state and return the new one, so a frame is
//! only ever drawn from a finished state.

use std::io::{Read, Write};

use super::events::{Event, EventHandler};
use super::terminal::TerminalControl;
use super::TuiError;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Messages understood by a [`Model`]
pub trait Message: From<Event> {
    /// The distinguished message that ends the program
    fn quit() -> Self;

    fn is_quit(&self) -> bool;
}

/// Deferred work: a one-shot task producing a single message
pub struct Cmd<M>(Box<dyn FnOnce() -> M>);

impl<M: 'static> Cmd<M> {
    pub fn new(task: impl FnOnce() -> M + 'static) -> Self {
        Self(Box::new(task))
    }

    pub fn run(self) -> M {
        (self.0)()
    }
}

impl<M: Message + 'static> Cmd<M> {
    pub fn quit() -> Self {
        Self::new(M::quit)
    }
}

impl<M> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cmd(..)")
    }
}

/// Application state driven by [`Program`]
pub trait Model: Sized {
    type Msg: Message + 'static;

    /// Work to run once after the first frame
    fn init(&self) -> Option<Cmd<Self::Msg>> {
        None
    }

    fn update(self, msg: Self::Msg) -> (Self, Option<Cmd<Self::Msg>>);

    fn view(&self) -> String;
}

/// Result of running a deferred-work chain
#[derive(Debug)]
pub enum Flow<M> {
    Continue(M),
    Quit(M),
}

/// Run `cmd` and every follow-up it leads to.
///
/// Each result is fed back through `update`; a quit message stops the chain
/// before any further transition.
pub fn run_cmd_chain<M: Model>(mut model: M, cmd: Cmd<M::Msg>) -> Flow<M> {
    let mut next = Some(cmd);
    while let Some(cmd) = next.take() {
        let msg = cmd.run();
        if msg.is_quit() {
            return Flow::Quit(model);
        }
        let (updated, follow_up) = model.update(msg);
        model = updated;
        next = follow_up;
    }
    Flow::Continue(model)
}

/// Event loop over a terminal, an input source and an output sink
pub struct Program<T, R, W> {
    terminal: T,
    events: EventHandler<R>,
    out: W,
}

impl<T: TerminalControl, R: Read, W: Write> Program<T, R, W> {
    pub fn new(terminal: T, input: R, out: W) -> Self {
        Self {
            terminal,
            events: EventHandler::new(input),
            out,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Run until a quit message, returning the final state.
    ///
    /// Raw mode is restored on every exit path.
    pub fn run<M: Model>(&mut self, model: M) -> Result<M, TuiError> {
        let guard = self.terminal.enter_raw_mode()?;
        let result = self.event_loop(model);
        guard.restore();
        if let Err(e) = &result {
            tracing::debug!("Program stopped: {}", e);
        }
        result
    }

    fn event_loop<M: Model>(&mut self, mut model: M) -> Result<M, TuiError> {
        model = self.apply_size(model);
        self.draw(&model)?;

        if let Some(cmd) = model.init() {
            match run_cmd_chain(model, cmd) {
                Flow::Quit(m) => return Ok(m),
                Flow::Continue(m) => model = m,
            }
            self.draw(&model)?;
        }

        loop {
            let event = self.events.next()?;
            let (next, cmd) = model.update(M::Msg::from(event));
            model = next;
            if let Some(cmd) = cmd {
                match run_cmd_chain(model, cmd) {
                    Flow::Quit(m) => return Ok(m),
                    Flow::Continue(m) => model = m,
                }
            }
            model = self.apply_size(model);
            self.draw(&model)?;
        }
    }

    /// Fold the current size in; any work the resize asks for is dropped
    fn apply_size<M: Model>(&self, model: M) -> M {
        match self.terminal.size() {
            Some((cols, rows)) => model.update(M::Msg::from(Event::Resize(cols, rows))).0,
            None => model,
        }
    }

    fn draw<M: Model>(&mut self, model: &M) -> Result<(), TuiError> {
        let frame = model.view().replace('\n', "\r\n");
        self.out
            .write_all(CLEAR_SCREEN.as_bytes())
            .and_then(|_| self.out.write_all(frame.as_bytes()))
            .and_then(|_| self.out.flush())
            .map_err(TuiError::Render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::terminal::HeadlessTerminal;

    #[derive(Debug)]
    enum Msg {
        Key(Event),
        Step(u32),
        Quit,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            Msg::Key(event)
        }
    }

    impl Message for Msg {
        fn quit() -> Self {
            Msg::Quit
        }

        fn is_quit(&self) -> bool {
            matches!(self, Msg::Quit)
        }
    }

    #[derive(Debug, Default)]
    struct Counter {
        steps: Vec<u32>,
        size: Option<(u16, u16)>,
        keys: usize,
    }

    impl Model for Counter {
        type Msg = Msg;

        fn update(mut self, msg: Msg) -> (Self, Option<Cmd<Msg>>) {
            match msg {
                Msg::Key(Event::Resize(w, h)) => {
                    self.size = Some((w, h));
                    (self, None)
                }
                Msg::Key(Event::Char('q')) => (self, Some(Cmd::quit())),
                Msg::Key(Event::Char('c')) => (self, Some(Cmd::new(|| Msg::Step(1)))),
                Msg::Key(_) => {
                    self.keys += 1;
                    (self, None)
                }
                Msg::Step(n) => {
                    self.steps.push(n);
                    if n < 3 {
                        (self, Some(Cmd::new(move || Msg::Step(n + 1))))
                    } else {
                        (self, None)
                    }
                }
                Msg::Quit => (self, None),
            }
        }

        fn view(&self) -> String {
            format!("steps={:?}\nkeys={}", self.steps, self.keys)
        }
    }

    #[test]
    fn test_chain_runs_to_completion() {
        let flow = run_cmd_chain(Counter::default(), Cmd::new(|| Msg::Step(1)));
        match flow {
            Flow::Continue(m) => assert_eq!(m.steps, vec![1, 2, 3]),
            Flow::Quit(_) => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_quit_in_chain_stops_without_update() {
        let flow = run_cmd_chain(Counter::default(), Cmd::new(|| Msg::Quit));
        assert!(matches!(flow, Flow::Quit(m) if m.steps.is_empty()));
    }

    #[test]
    fn test_program_runs_until_quit() {
        let mut out = Vec::new();
        let mut program = Program::new(
            HeadlessTerminal::new(Some((80, 24))),
            &b"xcq"[..],
            &mut out,
        );
        let model = program.run(Counter::default()).unwrap();
        assert_eq!(model.steps, vec![1, 2, 3]);
        assert_eq!(model.keys, 1);
        assert_eq!(model.size, Some((80, 24)));
        assert_eq!(program.terminal().restored(), 1);
        drop(program);

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.starts_with(CLEAR_SCREEN));
        assert!(screen.contains("steps=[1, 2, 3]\r\nkeys=1"));
    }

    #[test]
    fn test_closed_input_restores_terminal() {
        let term = HeadlessTerminal::new(None);
        let mut program = Program::new(term, &b"x"[..], Vec::new());
        let err = program.run(Counter::default()).unwrap_err();
        assert!(matches!(err, TuiError::InputClosed));
        assert_eq!(program.terminal().restored(), 1);
    }

    #[test]
    fn test_raw_mode_failure_propagates() {
        let mut program = Program::new(HeadlessTerminal::unsupported(), &b"q"[..], Vec::new());
        assert!(matches!(
            program.run(Counter::default()),
            Err(TuiError::TerminalInit(_))
        ));
    }
}
