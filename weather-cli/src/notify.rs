use weather_core::Notifier;

/// Prints alerts to stderr so they stay visible next to the readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "user alert");
        eprintln!("\n  ! {message}\n");
    }
}
