//! Pour reminders printed to the terminal.

use drip_core::Notifier;
use log::info;

/// Prints each reminder on its own line, with a bell when output is rich.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    bell: bool,
}

impl TerminalNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    fn line(&self, payload: &str) -> String {
        if self.bell {
            format!("\x07>> {payload}")
        } else {
            format!(">> {payload}")
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify_now(&self, payload: &str) {
        info!("Reminder: {payload}");
        println!("{}", self.line(payload));
    }
}
