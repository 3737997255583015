//! Interactive login prompts on stderr, so report output on stdout stays clean.
use std::{
    error::Error,
    io::{self, BufRead, Stderr, Write},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, ClearType},
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// What a key press does to a hidden input line.
#[derive(Debug, PartialEq, Eq)]
enum Key {
    Submit,
    Cancel(&'static str),
    Erase,
    Insert(char),
    Ignore,
}

fn classify(key: KeyEvent) -> Key {
    if key.kind == KeyEventKind::Release {
        return Key::Ignore;
    }
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Key::Submit,
        KeyCode::Esc => Key::Cancel("login cancelled"),
        KeyCode::Char('c' | 'd') if control => Key::Cancel("interrupted"),
        KeyCode::Backspace => Key::Erase,
        KeyCode::Char(ch) if !control => Key::Insert(ch),
        _ => Key::Ignore,
    }
}

/// Raw mode for as long as the value lives.
struct RawMode;

impl RawMode {
    fn on() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn show_prompt(out: &mut Stderr, prompt: &str) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()
}

/// Reads a line without echoing it; every typed character shows as `*`.
pub fn password(prompt: &str) -> PromptResult<String> {
    let mut out = io::stderr();
    let _raw = RawMode::on()?;
    show_prompt(&mut out, prompt)?;

    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match classify(key) {
            Key::Submit => break,
            Key::Cancel(reason) => {
                queue!(out, Print("\r\n"))?;
                out.flush()?;
                return Err(reason.into());
            }
            Key::Erase => {
                if secret.pop().is_none() {
                    continue;
                }
                queue!(out, cursor::MoveLeft(1), Print(' '), cursor::MoveLeft(1))?;
            }
            Key::Insert(ch) => {
                secret.push(ch);
                queue!(out, Print('*'))?;
            }
            Key::Ignore => continue,
        }
        out.flush()?;
    }

    queue!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(secret)
}

/// Reads one echoed line, trimmed.
pub fn line(prompt: &str) -> PromptResult<String> {
    let mut out = io::stderr();
    show_prompt(&mut out, prompt)?;

    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}
