use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

/// Input for the main loop, stamped with the moment it was read so that
/// timing-sensitive games measure from the key press rather than from when
/// the loop got round to it.
pub enum Event {
    Key(KeyEvent, Instant),
    Tick(Instant),
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(crossterm::event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key, Instant::now())
                    }
                    // Resizes and releases just trigger a redraw.
                    _ => Event::Tick(Instant::now()),
                }
            } else {
                Event::Tick(Instant::now())
            };
            if tx.send(event).is_err() {
                return;
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
