use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Collects event fields as JSON values.
#[derive(Default)]
struct FieldCollector(Map<String, Value>);

impl Visit for FieldCollector {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.0
            .insert(field.name().to_string(), value.to_string().into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value).into());
    }
}

/// One JSON object per line, shaped after the OpenTelemetry log data model.
struct OtelJsonFormat {
    resource: Value,
}

impl OtelJsonFormat {
    fn new(config: &LoggingConfig) -> Self {
        let mut resource = Map::new();
        resource.insert("service.name".into(), config.service_name.clone().into());
        resource.insert(
            "service.version".into(),
            config.service_version.clone().into(),
        );
        OtelJsonFormat {
            resource: Value::Object(resource),
        }
    }

    fn severity_number(level: &Level) -> u64 {
        match *level {
            Level::TRACE => 1,
            Level::DEBUG => 5,
            Level::INFO => 9,
            Level::WARN => 13,
            Level::ERROR => 17,
        }
    }

    fn render(&self, event: &Event<'_>) -> Value {
        let metadata = event.metadata();
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let mut attributes = fields.0;

        // Our events use underscores; OTel semantic conventions use dots.
        for (from, to) in [("event_name", "event.name"), ("event_domain", "event.domain")] {
            if let Some(v) = attributes.remove(from) {
                attributes.insert(to.to_string(), v);
            }
        }
        if let Some(file) = metadata.file() {
            attributes.insert("code.filepath".into(), file.into());
        }
        if let Some(line) = metadata.line() {
            attributes.insert("code.lineno".into(), line.into());
        }
        attributes.insert("code.target".into(), metadata.target().into());

        let body = match attributes.remove("message") {
            Some(Value::String(s)) => s,
            _ => metadata.name().to_string(),
        };

        serde_json::json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "severity_text": metadata.level().as_str(),
            "severity_number": Self::severity_number(metadata.level()),
            "body": body,
            "resource": self.resource.clone(),
            "attributes": attributes,
        })
    }
}

impl<S, N> FormatEvent<S, N> for OtelJsonFormat
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let line = serde_json::to_string(&self.render(event)).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            level
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Console,
}

fn parse_format(format: &str) -> Result<LogFormat, String> {
    match format.trim().to_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "console" => Ok(LogFormat::Console),
        _ => Err(format!(
            "Invalid logging.format '{}'. Valid values: json, console",
            format
        )),
    }
}

/// Installs the global tracing subscriber described by `logging_config`.
///
/// `RUST_LOG` directives are honoured on top of the configured level.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), String> {
    let level_filter = parse_level(&logging_config.level)?;
    let format = parse_format(&logging_config.format)?;
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().event_format(OtelJsonFormat::new(logging_config)))
            .try_init(),
        LogFormat::Console => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().pretty())
            .try_init(),
    };
    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}
