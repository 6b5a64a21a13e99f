use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use chat_core::{update, AppState, Effect, Msg, ReplyPolicy, SelectedFile};
use chat_engine::Backend;
use chat_logging::{chat_debug, chat_info};

use super::effects::EffectRunner;
use super::input::{parse_line, Command, HELP};
use super::render::Renderer;
use super::AppEvent;

pub fn run_chat(backend: Arc<dyn Backend>, reply_policy: ReplyPolicy) -> anyhow::Result<()> {
    let (app_tx, app_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(backend, app_tx.clone())?;

    spawn_stdin_reader(app_tx);

    let mut app = ChatApp::new(
        AppState::with_reply_policy(reply_policy),
        effects,
        Renderer::new(io::stdout()),
    );
    app.start()?;

    for event in app_rx {
        let flow = match event {
            AppEvent::Line(line) => app.handle_line(&line)?,
            AppEvent::Msg(msg) => {
                app.dispatch(msg)?;
                Flow::Continue
            }
            AppEvent::InputClosed => Flow::Quit,
        };
        if flow == Flow::Quit {
            break;
        }
    }

    chat_info!("Chat session ended");
    Ok(())
}

fn spawn_stdin_reader(app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if app_tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = app_tx.send(AppEvent::InputClosed);
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct ChatApp<W: Write> {
    state: AppState,
    effects: EffectRunner,
    renderer: Renderer<W>,
    /// The next line is a path answering the file picker.
    picker_open: bool,
}

impl<W: Write> ChatApp<W> {
    fn new(state: AppState, effects: EffectRunner, renderer: Renderer<W>) -> Self {
        Self {
            state,
            effects,
            renderer,
            picker_open: false,
        }
    }

    fn start(&mut self) -> io::Result<()> {
        self.renderer.line(HELP)?;
        let view = self.state.view();
        self.renderer.render(&view)
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        if self.picker_open {
            self.picker_open = false;
            let path = line.trim();
            // An empty answer cancels the picker, which clears the selection.
            let selection = if path.is_empty() {
                None
            } else {
                match self.checked_file(Path::new(path))? {
                    Some(file) => Some(file),
                    None => return Ok(Flow::Continue),
                }
            };
            self.dispatch(Msg::FileSelected(selection))?;
            return Ok(Flow::Continue);
        }

        match parse_line(line) {
            Command::Say(text) => {
                self.dispatch_all([Msg::InputChanged(text), Msg::SubmitClicked])?;
            }
            Command::Action => self.dispatch(Msg::ActionClicked)?,
            Command::Upload => self.dispatch(Msg::UploadClicked)?,
            Command::Attach(path) => {
                if let Some(file) = self.checked_file(&path)? {
                    self.dispatch(Msg::FileSelected(Some(file)))?;
                }
            }
            Command::Detach => self.dispatch(Msg::FileSelected(None))?,
            Command::Status => {
                let status = self.state.view().upload_status;
                self.renderer.line(&format!("[upload] {status}"))?;
            }
            Command::Help => self.renderer.line(HELP)?,
            Command::Unknown(text) => {
                self.renderer.line(&format!("Unknown command {text}; /help lists commands"))?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        self.dispatch_all([msg])
    }

    /// Applies `msgs` in order, then renders at most once.
    fn dispatch_all(&mut self, msgs: impl IntoIterator<Item = Msg>) -> io::Result<()> {
        let mut state = std::mem::take(&mut self.state);
        let mut effects = Vec::new();
        for msg in msgs {
            chat_debug!("dispatch {:?}", msg);
            let (next, mut produced) = update(state, msg);
            state = next;
            effects.append(&mut produced);
        }
        let view = state.view();
        let was_dirty = state.consume_dirty();
        state.consume_scroll();
        self.state = state;

        if was_dirty {
            self.renderer.render(&view)?;
        }
        for effect in effects {
            match effect {
                Effect::OpenFilePicker => self.open_picker()?,
                other => self.effects.run(other),
            }
        }
        Ok(())
    }

    fn open_picker(&mut self) -> io::Result<()> {
        self.picker_open = true;
        self.renderer.line("Path of the file to upload (empty line cancels):")
    }

    fn checked_file(&mut self, path: &Path) -> io::Result<Option<SelectedFile>> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(Some(SelectedFile::from_path(path))),
            Ok(_) => {
                self.renderer.line(&format!("Not a file: {}", path.display()))?;
                Ok(None)
            }
            Err(err) => {
                self.renderer.line(&format!("Cannot open {}: {err}", path.display()))?;
                Ok(None)
            }
        }
    }
}
