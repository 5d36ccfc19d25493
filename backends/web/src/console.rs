//! Forwarding tracing events to the browser console.

use std::fmt::Write as _;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;
use waterui_embed::logging::{level_allows, log_level};

static TRACING_INSTALLED: Once = Once::new();

/// Installs the console layer as the global subscriber (idempotent).
pub fn install_console_tracing() {
    TRACING_INSTALLED.call_once(|| {
        if tracing_subscriber::registry()
            .with(ConsoleLayer)
            .try_init()
            .is_err()
        {
            web_sys::console::warn_1(&JsValue::from_str(
                "waterui-embed console tracing failed to initialize",
            ));
        }
    });
}

/// Writes each event to the console method matching its level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLayer;

impl<S> Layer<S> for ConsoleLayer
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if !level_allows(log_level(), level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = JsValue::from_str(&visitor.line(event.metadata().target()));

        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            Level::DEBUG => web_sys::console::debug_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn line(&self, target: &str) -> String {
        let message = self.message.as_deref().unwrap_or_default();
        format!("[{target}] {message}{}", self.fields)
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}
