// terminal host for the engine: number keys pick a sound, +/- set the level

use std::io;
use std::io::stdout;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Alignment,
    prelude::Stylize,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use tokio::sync::{watch, mpsc};

use ambient::audio_system::{AmbientHandle, EngineSnapshot};
use ambient::config::{TICK, VOLUME_STEP};
use ambient::sound::clamp_volume;
use ambient::{PlaybackState, SoundType};

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

/// what a key press asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Play(SoundType),
    NextSound,
    Louder,
    Quieter,
    Stop,
    Quit,
}

fn action_for(k: &KeyEvent) -> Option<Action> {
    if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
        return Some(Action::Quit);
    }
    match k.code {
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            Some(Action::Play(SoundType::ALL[idx]))
        }
        KeyCode::Char('n') => Some(Action::NextSound),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(Action::Louder),
        KeyCode::Char('-') | KeyCode::Down => Some(Action::Quieter),
        KeyCode::Char(' ') => Some(Action::Stop),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

pub async fn run_ui(
    handle: AmbientHandle,
    shutdown_tx: watch::Sender<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = stdout();

    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let _guard = TuiGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (key_tx, mut key_rx) = mpsc::unbounded_channel::<KeyEvent>();

    let stop = Arc::new(AtomicBool::new(false));
    let stop_bg = stop.clone();

    // crossterm reads block, so keys come from a plain thread
    std::thread::spawn(move || {
        while !stop_bg.load(Ordering::Relaxed) {
            if event::poll(Duration::from_millis(50)).ok() == Some(true) {
                if let Ok(Event::Key(k)) = event::read() {
                    if k.kind == KeyEventKind::Press {
                        let _ = key_tx.send(k);
                    }
                }
            }
        }
    });

    let mut volume = handle.snapshot().volume;

    loop {
        let snapshot = handle.snapshot();
        terminal.draw(|f| draw_ui(f, &snapshot, volume))?;

        tokio::select! {
            k = key_rx.recv() => {
                let Some(k) = k else { break; };
                let Some(action) = action_for(&k) else { continue; };

                match action {
                    Action::Play(sound) => handle.start(sound, volume)?,
                    Action::NextSound => {
                        let next = snapshot.state.sound().map_or(SoundType::WhiteNoise, SoundType::next);
                        handle.start(next, volume)?;
                    }
                    Action::Louder | Action::Quieter => {
                        let step = if action == Action::Louder { VOLUME_STEP } else { -VOLUME_STEP };
                        volume = clamp_volume(volume + step);
                        handle.set_volume(volume)?;
                    }
                    Action::Stop => handle.stop()?,
                    Action::Quit => {
                        let _ = shutdown_tx.send(true);
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(TICK)) => {}
        }
    }

    stop.store(true, Ordering::Relaxed);
    terminal.show_cursor()?;
    Ok(())
}

fn volume_bar(volume: f32) -> String {
    let filled = (volume * 20.0).round() as usize;
    format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(20 - filled), (volume * 100.0).round() as u32)
}

fn draw_ui(f: &mut ratatui::Frame, snapshot: &EngineSnapshot, volume: f32) {
    let state = match snapshot.state {
        PlaybackState::Idle => "idle".to_string(),
        PlaybackState::Playing(sound) => format!("playing {sound}"),
    };

    let mut lines = vec![
        Line::from(Span::raw("a m b i e n t").bold()),
        Line::from(""),
        Line::from(vec![Span::raw("state   "), Span::raw(state).bold()]),
        Line::from(vec![Span::raw("volume  "), Span::raw(volume_bar(volume))]),
    ];
    if let Some(err) = &snapshot.last_error {
        lines.push(Line::from(vec![Span::raw("error   "), Span::raw(err.to_string()).red()]));
    }
    lines.push(Line::from(""));
    for (i, sound) in SoundType::ALL.iter().enumerate() {
        lines.push(Line::from(format!("{}  {}", i + 1, sound)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("n next   +/- volume   space stop   q quit"));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(Block::bordered());

    f.render_widget(widget, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_pick_sounds_in_order() {
        assert_eq!(action_for(&key(KeyCode::Char('1'))), Some(Action::Play(SoundType::WhiteNoise)));
        assert_eq!(action_for(&key(KeyCode::Char('6'))), Some(Action::Play(SoundType::Binaural)));
        assert_eq!(action_for(&key(KeyCode::Char('7'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let k = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&k), Some(Action::Quit));
        assert_eq!(action_for(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn volume_bar_tracks_level() {
        assert_eq!(volume_bar(0.5), "[##########----------]  50%");
        assert_eq!(volume_bar(1.0), "[####################] 100%");
    }
}
