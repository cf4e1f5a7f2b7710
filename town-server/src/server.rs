//! A minimal line-oriented front end driving a [`TownRegistry`]. Stands in for the
//! real-time transport (WebSocket/REST) that would sit in front of the core in a
//! deployed system.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use tracing::info;

use town_core::{TownController, TownEvent, TownListener, TownRegistry};

use crate::command;

/// Reads stdin on a background thread and makes each line available as a channel
/// event, so the main loop can select between input and other future event sources
/// without blocking on a synchronous read.
pub struct Server {
    registry: Arc<TownRegistry>,
    lines: Receiver<String>,
}

impl Server {

    pub fn new(registry: Arc<TownRegistry>) -> Self {
        let (tx, rx) = bounded(16);
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => if tx.send(line).is_err() {
                        break;
                    },
                    Err(_) => break,
                }
            }
        });
        Self { registry, lines: rx }
    }

    /// Run the control loop until stdin closes.
    pub fn run(&self) {
        info!("town-server ready, type `help` for a list of commands");
        for line in &self.lines {
            command::handle_command(&line, &self.registry);
        }
    }

}

/// Prints every event fanned out by a town's controller. Attached to every town
/// created through the registry so the operator console stays informative without
/// the transport layer this crate doesn't implement.
pub struct LoggingListener {
    pub town_id: String,
}

impl TownListener for LoggingListener {
    fn on_event(&self, event: &TownEvent) {
        println!("[{}] {event:?}", self.town_id);
    }
}

/// Attach a [`LoggingListener`] to `controller`, returning the handle so it can
/// later be detached with [`TownController::remove_listener`].
pub fn attach_logging_listener(controller: &Arc<TownController>) -> Arc<dyn TownListener> {
    let listener: Arc<dyn TownListener> = Arc::new(LoggingListener { town_id: controller.id().to_string() });
    controller.add_listener(listener.clone());
    listener
}
