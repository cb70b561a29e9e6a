use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use guard_logging::{guard_debug, guard_error, guard_info};
use truthguard_core::{update, InputMode, Msg, SubmissionState, Theme};
use truthguard_engine::{PreferenceStore, ReqwestDetectorClient, TesseractEngine};

use super::commands::{self, SessionCommand};
use super::effects::EffectRunner;
use super::persistence;
use super::ui::palette::Palette;
use super::ui::render;
use crate::cli::{Command, DetectArgs};
use crate::config::AppConfig;

/// How often the loop wakes up while waiting on the engine.
const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub fn run(command: Command, config: &AppConfig) -> Result<ExitCode> {
    let store = PreferenceStore::new(&config.config_dir);
    match command {
        Command::Theme { theme } => {
            run_theme(&store, theme, &mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Detect(args) => {
            let input = DetectInput::from_args(args)?;
            let mut session = open_session(config, store)?;
            if session.detect(input)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Interactive => {
            let mut session = open_session(config, store)?;
            session.interactive(io::stdin().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_session(config: &AppConfig, store: PreferenceStore) -> Result<Session<io::Stdout>> {
    let client = ReqwestDetectorClient::new(config.client_settings()?)
        .context("invalid detection server address")?;
    guard_info!(
        "Using detection server {} (timeout {:?})",
        client.predict_url(),
        config.request_timeout
    );
    let ocr = TesseractEngine::new(config.ocr_settings());
    let runner = EffectRunner::new(Arc::new(client), Arc::new(ocr), store)
        .context("could not start the background engine")?;
    Session::new(runner, io::stdout(), config.call_deadline(), Palette::detect)
        .context("could not write to stdout")
}

pub(crate) fn run_theme(
    store: &PreferenceStore,
    theme: Option<Theme>,
    out: &mut impl Write,
) -> Result<()> {
    match theme {
        None => writeln!(out, "Theme: {}", persistence::load_theme(store).label())?,
        Some(theme) => {
            let path = persistence::save_theme(store, theme)
                .with_context(|| format!("could not save preferences to {:?}", store.path()))?;
            writeln!(out, "Theme set to {} ({})", theme.label(), path.display())?;
        }
    }
    Ok(())
}

/// One-shot input for `truthguard detect`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DetectInput {
    Text(String),
    Url(String),
    Image { file_name: String, bytes: Vec<u8> },
}

impl DetectInput {
    fn from_args(args: DetectArgs) -> Result<Self> {
        match (args.text, args.url, args.image) {
            (Some(text), _, _) => Ok(Self::Text(text)),
            (None, Some(url), _) => Ok(Self::Url(url)),
            (None, None, Some(path)) => {
                let (file_name, bytes) = read_image(&path)?;
                Ok(Self::Image { file_name, bytes })
            }
            (None, None, None) => bail!("one of --text, --url or --image is required"),
        }
    }
}

fn read_image(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = fs::read(path).with_context(|| format!("could not read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((file_name, bytes))
}

/// Drives the submission state machine against the engine and writes
/// everything the user sees to `out`.
pub(crate) struct Session<W: Write> {
    state: SubmissionState,
    runner: EffectRunner,
    out: W,
    deadline: Duration,
    palette_for: fn(Theme) -> Palette,
    palette: Palette,
    view_changed: bool,
    last_status: Option<String>,
}

impl<W: Write> Session<W> {
    pub(crate) fn new(
        runner: EffectRunner,
        out: W,
        deadline: Duration,
        palette_for: fn(Theme) -> Palette,
    ) -> io::Result<Self> {
        let theme = persistence::load_theme(runner.store());
        let mut session = Self {
            state: SubmissionState::new(),
            runner,
            out,
            deadline,
            palette_for,
            palette: palette_for(theme),
            view_changed: false,
            last_status: None,
        };
        session.dispatch(Msg::ThemeRestored(theme))?;
        session.view_changed = false;
        Ok(session)
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Runs one detection; true when a probability was produced.
    pub(crate) fn detect(&mut self, input: DetectInput) -> Result<bool> {
        match input {
            DetectInput::Text(text) => {
                self.dispatch(Msg::ModeSelected(InputMode::Text))?;
                self.dispatch(Msg::TextChanged(text))?;
            }
            DetectInput::Url(url) => {
                self.dispatch(Msg::ModeSelected(InputMode::Url))?;
                self.dispatch(Msg::UrlChanged(url))?;
            }
            DetectInput::Image { file_name, bytes } => {
                self.select_image(file_name, bytes)?;
            }
        }
        self.detect_current()?;
        Ok(self.state.probability().is_some())
    }

    pub(crate) fn interactive<R: BufRead>(&mut self, input: R) -> Result<()> {
        writeln!(self.out, "Type `help` for commands.")?;
        self.show()?;
        self.prompt()?;
        for line in input.lines() {
            let line = line.context("could not read input")?;
            match commands::parse_line(&line) {
                Ok(None) => {}
                Ok(Some(SessionCommand::Quit)) => break,
                Ok(Some(command)) => self.execute(command)?,
                Err(message) => writeln!(self.out, "{}", self.palette.error(&message))?,
            }
            self.prompt()?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn execute(&mut self, command: SessionCommand) -> Result<()> {
        guard_debug!("session command {:?}", command);
        match command {
            SessionCommand::Mode(mode) => self.dispatch(Msg::ModeSelected(mode))?,
            SessionCommand::Text(text) => self.dispatch(Msg::TextChanged(text))?,
            SessionCommand::Url(url) => self.dispatch(Msg::UrlChanged(url))?,
            SessionCommand::Image(path) => match read_image(&path) {
                Ok((file_name, bytes)) => {
                    self.select_image(file_name, bytes)?;
                    self.flush_view()?;
                }
                Err(err) => writeln!(self.out, "{} {err:#}", self.palette.error("error:"))?,
            },
            SessionCommand::Detect => self.detect_current()?,
            SessionCommand::Theme(theme) => self.dispatch(Msg::ThemeSelected(theme))?,
            SessionCommand::Show => self.show()?,
            SessionCommand::Help => writeln!(self.out, "{}", commands::HELP)?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn select_image(&mut self, file_name: String, bytes: Vec<u8>) -> Result<()> {
        self.dispatch(Msg::ModeSelected(InputMode::Image))?;
        self.dispatch(Msg::ImageSelected { file_name, bytes })?;
        self.settle()
    }

    fn detect_current(&mut self) -> Result<()> {
        if self.state.is_detect_disabled() {
            writeln!(
                self.out,
                "Nothing to detect: the {} input is empty.",
                self.state.mode().label()
            )?;
            return Ok(());
        }
        self.dispatch(Msg::DetectClicked)?;
        self.settle()?;
        self.flush_view()?;
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        for notification in self.runner.run(effects) {
            writeln!(
                self.out,
                "{}",
                render::notification(&notification, &self.palette)
            )?;
        }

        if self.state.consume_dirty() {
            self.view_changed = true;
            self.palette = (self.palette_for)(self.state.theme());
            let view = self.state.view();
            let status = render::status_line(&view, &self.palette);
            if status.is_some() && status != self.last_status {
                if let Some(line) = &status {
                    writeln!(self.out, "{line}")?;
                }
            }
            self.last_status = status;
        }
        Ok(())
    }

    /// Feeds engine events back in until nothing is pending.
    fn settle(&mut self) -> Result<()> {
        let mut last_event = Instant::now();
        while self.state.is_loading() {
            match self.runner.next_msg(POLL_INTERVAL) {
                Some(msg) => {
                    last_event = Instant::now();
                    self.dispatch(msg)?;
                }
                None if last_event.elapsed() > self.deadline => {
                    guard_error!("engine gave no answer within {:?}", self.deadline);
                    bail!("the background engine stopped answering");
                }
                None => self.dispatch(Msg::Tick)?,
            }
        }
        self.last_status = None;
        Ok(())
    }

    fn flush_view(&mut self) -> io::Result<()> {
        if self.view_changed {
            self.show()?;
        }
        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        self.view_changed = false;
        let view = self.state.view();
        writeln!(self.out, "{}", render::render(&view, &self.palette))
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}
