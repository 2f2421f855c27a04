use crate::config::Config;
use std::io;
use std::sync::mpsc;
use std::thread;

use termion::event::Key;
use termion::input::TermRead;

pub enum HostEvent {
    Input(Key),
    Tick,
}

/// Fans stdin keys and a periodic tick into a single channel the event loop
/// blocks on.
pub struct Dispatcher {
    rx: mpsc::Receiver<HostEvent>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> Dispatcher {
        let tick_rate = config.tick_rate();
        let (tx, rx) = mpsc::channel();

        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                for evt in stdin.lock().keys() {
                    if let Ok(key) = evt {
                        if tx.send(HostEvent::Input(key)).is_err() {
                            return;
                        }
                    }
                }
            })
        };

        let tick_handle = thread::spawn(move || loop {
            if tx.send(HostEvent::Tick).is_err() {
                return;
            }
            thread::sleep(tick_rate);
        });

        Dispatcher {
            rx,
            _input_handle: input_handle,
            _tick_handle: tick_handle,
        }
    }

    pub fn next(&self) -> Result<HostEvent, mpsc::RecvError> {
        self.rx.recv()
    }
}
