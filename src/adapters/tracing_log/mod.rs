// Tracing log adapter - Interactor progress routed into `tracing`

use crate::ports::*;
use async_trait::async_trait;

/// Context keys promoted to first-class `tracing` fields
const STRUCTURED_KEYS: [&str; 4] = ["channel", "stream_id", "attempt", "path"];

/// `LogPort` over the global `tracing` dispatcher
///
/// Subscriber setup happens once in `utils::logging`; this adapter only emits.
#[derive(Default)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Event context split into named fields and a sorted remainder
struct EventFields<'a> {
    channel: Option<&'a str>,
    stream_id: Option<&'a str>,
    attempt: Option<&'a str>,
    path: Option<&'a str>,
    extra: Option<String>,
}

impl<'a> EventFields<'a> {
    fn from_event(event: &'a LogEvent) -> Self {
        let field = |key: &str| event.context.get(key).map(String::as_str);

        let mut rest: Vec<_> = event
            .context
            .iter()
            .filter(|(k, _)| !STRUCTURED_KEYS.contains(&k.as_str()))
            .collect();
        rest.sort();
        let extra = (!rest.is_empty()).then(|| {
            rest.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ")
        });

        Self {
            channel: field("channel"),
            stream_id: field("stream_id"),
            attempt: field("attempt"),
            path: field("path"),
            extra,
        }
    }
}

macro_rules! emit_at {
    ($level:ident, $fields:expr, $message:expr) => {
        tracing::$level!(
            channel = $fields.channel,
            stream_id = $fields.stream_id,
            attempt = $fields.attempt,
            path = $fields.path,
            context = $fields.extra.as_deref(),
            "{}",
            $message
        )
    };
}

fn emit(event: &LogEvent) {
    let fields = EventFields::from_event(event);
    match event.level {
        LogLevel::Error => emit_at!(error, fields, event.message),
        LogLevel::Warn => emit_at!(warn, fields, event.message),
        LogLevel::Info => emit_at!(info, fields, event.message),
        LogLevel::Debug => emit_at!(debug, fields, event.message),
        LogLevel::Trace => emit_at!(trace, fields, event.message),
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Info, message)).await;
    }

    async fn warn(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Warn, message)).await;
    }

    async fn error(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Error, message)).await;
    }

    async fn log_event(&self, event: &LogEvent) {
        emit(event);
    }
}
