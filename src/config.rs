//! JSON configuration loading
//!
//! ```json
//! { "filters": [
//!   { "tag": "stdout", "level": "DEBUG", "type": "console",
//!     "properties": { "color": "false" } },
//!   { "tag": "file", "level": "FINEST", "type": "file",
//!     "properties": { "filename": "app.log", "buffered": "1024" } } ] }
//! ```
//!
//! Every writer in a document is built before any filter is registered, so
//! a document with one bad entry leaves the dispatcher untouched.

use crate::core::{
    Dispatcher, ErrorHandler, LogLevel, LogWriter, LoggerError, OutputFormat, Result, TimestampFormat,
};
use crate::writers::{ChannelWriter, FileWriter, JsonWriter, MemoryWriter, OverflowPolicy, SocketWriter};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub tag: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub level: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

fn enabled_by_default() -> bool {
    true
}

impl ConfigFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Properties of one filter entry, with lookups that name the entry on failure
pub struct WriterProperties<'a> {
    tag: &'a str,
    values: &'a BTreeMap<String, String>,
}

impl<'a> WriterProperties<'a> {
    pub fn tag(&self) -> &str {
        self.tag
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).map(|v| v.trim())
    }

    pub fn require(&self, key: &str) -> Result<&'a str> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| self.invalid(format!("missing required property '{}'", key)))
    }

    /// Parse an optional property, falling back to `default` when absent
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|_| self.invalid(format!("bad value '{}' for property '{}'", raw, key))),
            None => Ok(default),
        }
    }

    fn invalid(&self, message: String) -> LoggerError {
        LoggerError::config(format!("filter '{}'", self.tag), message)
    }
}

/// Builds a writer from an entry's properties
pub type WriterFactory = Arc<dyn Fn(&WriterProperties<'_>) -> Result<Box<dyn LogWriter>> + Send + Sync>;

/// Maps the `type` field of a filter entry to a writer factory
#[derive(Clone)]
pub struct WriterRegistry {
    factories: HashMap<String, WriterFactory>,
}

impl WriterRegistry {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// `console`, `file`, `json`, `socket` and `memory`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();

        #[cfg(feature = "console")]
        registry.register("console", |props| {
            let writer = crate::writers::ConsoleWriter::with_colors(props.parse_or("color", true)?)
                .with_output_format(props.parse_or("format", OutputFormat::Text)?)
                .with_timestamp_format(props.parse_or("timestamp", TimestampFormat::Classic)?);
            Ok(Box::new(writer))
        });

        registry.register("file", |props| {
            let writer = FileWriter::new(props.require("filename")?)?
                .with_output_format(props.parse_or("format", OutputFormat::Text)?)
                .with_timestamp_format(props.parse_or("timestamp", TimestampFormat::Classic)?);
            Ok(Box::new(writer))
        });

        registry.register("json", |props| {
            let writer = JsonWriter::new(props.require("filename")?)?.pretty(props.parse_or("pretty", false)?);
            Ok(Box::new(writer))
        });

        registry.register("socket", |props| {
            let writer = SocketWriter::connect(props.require("endpoint")?)?
                .with_reconnect(props.parse_or("reconnect", true)?);
            Ok(Box::new(writer))
        });

        registry.register("memory", |props| {
            Ok(Box::new(MemoryWriter::new(props.parse_or("capacity", 1000usize)?)))
        });

        registry
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&WriterProperties<'_>) -> Result<Box<dyn LogWriter>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into().to_lowercase(), Arc::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(&kind.to_lowercase())
    }

    /// Build the writer for one entry, wrapping it in a [`ChannelWriter`]
    /// when the entry sets `buffered`
    pub fn build(&self, entry: &FilterConfig) -> Result<Box<dyn LogWriter>> {
        self.build_reporting_to(entry, None)
    }

    /// Like [`WriterRegistry::build`]; a buffered writer reports worker
    /// failures to `handler`
    pub fn build_reporting_to(
        &self,
        entry: &FilterConfig,
        handler: Option<&ErrorHandler>,
    ) -> Result<Box<dyn LogWriter>> {
        let factory = self
            .factories
            .get(&entry.kind.trim().to_lowercase())
            .ok_or_else(|| LoggerError::unknown_kind(&entry.tag, &entry.kind))?;

        let props = WriterProperties {
            tag: &entry.tag,
            values: &entry.properties,
        };
        let writer = factory(&props)?;

        match props.get("buffered") {
            Some(_) => {
                let capacity: usize = props.parse_or("buffered", 0)?;
                let policy = props.parse_or("overflow", OverflowPolicy::Drop)?;
                let channel = match handler {
                    Some(handler) => {
                        ChannelWriter::with_error_handler(writer, capacity, policy, Arc::clone(handler))?
                    }
                    None => ChannelWriter::new(writer, capacity, policy)?,
                };
                Ok(Box::new(channel))
            }
            None => Ok(writer),
        }
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

type Prepared = Vec<(String, LogLevel, Box<dyn LogWriter>)>;

/// Validate every entry and build every enabled writer, in document order.
/// On failure the writers built so far are closed.
fn prepare(
    config: &ConfigFile,
    registry: &WriterRegistry,
    handler: Option<&ErrorHandler>,
) -> Result<Prepared> {
    let mut prepared = Vec::new();
    match prepare_into(&mut prepared, config, registry, handler) {
        Ok(()) => Ok(prepared),
        Err(e) => {
            for (_, _, mut writer) in prepared {
                let _ = writer.close();
            }
            Err(e)
        }
    }
}

fn prepare_into(
    prepared: &mut Prepared,
    config: &ConfigFile,
    registry: &WriterRegistry,
    handler: Option<&ErrorHandler>,
) -> Result<()> {
    let mut seen = HashSet::new();

    for (index, entry) in config.filters.iter().enumerate() {
        let tag = entry.tag.trim();
        if tag.is_empty() {
            return Err(LoggerError::config(
                format!("filter #{}", index + 1),
                "missing required field 'tag'",
            ));
        }
        if !seen.insert(tag.to_string()) {
            return Err(LoggerError::config(
                format!("filter '{}'", tag),
                "tag appears more than once",
            ));
        }

        let level: LogLevel = entry
            .level
            .parse()
            .map_err(|_| LoggerError::InvalidLevel(entry.level.clone()))?;
        if !registry.contains(&entry.kind) {
            return Err(LoggerError::unknown_kind(tag, &entry.kind));
        }

        if entry.enabled {
            prepared.push((tag.to_string(), level, registry.build_reporting_to(entry, handler)?));
        }
    }

    Ok(())
}

impl Dispatcher {
    /// Apply a JSON configuration document using the built-in writer kinds
    pub fn load_configuration_str(&self, json: &str) -> Result<()> {
        self.load_configuration_with(json, &WriterRegistry::with_builtins())
    }

    /// Apply a JSON configuration document, resolving writer kinds through `registry`
    pub fn load_configuration_with(&self, json: &str, registry: &WriterRegistry) -> Result<()> {
        let config = ConfigFile::from_json(json)?;
        for (tag, level, writer) in prepare(&config, registry, self.error_handler())? {
            self.add_filter(tag, level, writer);
        }
        Ok(())
    }

    /// Read and apply a JSON configuration file
    pub fn load_configuration_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading configuration", path.display().to_string(), e)
        })?;
        self.load_configuration_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_file_filters_registered_in_order() -> Result<()> {
        let dir = tempdir()?;
        let text_path = dir.path().join("app.log");
        let json_path = dir.path().join("app.jsonl");
        let json = format!(
            r#"{{ "filters": [
                {{ "tag": "text", "level": "INFO", "type": "file",
                   "properties": {{ "filename": "{}" }} }},
                {{ "tag": "json", "level": "FINEST", "type": "json",
                   "properties": {{ "filename": "{}" }} }},
                {{ "tag": "off", "enabled": false, "level": "DEBUG", "type": "memory" }}
            ] }}"#,
            text_path.display(),
            json_path.display()
        );

        let log = Dispatcher::new();
        log.load_configuration_str(&json)?;
        assert_eq!(log.filter_names(), vec!["text", "json"]);
        assert_eq!(log.threshold_of("json"), Some(LogLevel::Finest));

        log.fine("only json");
        log.info("both");
        log.close()?;

        assert_eq!(fs::read_to_string(&text_path)?.lines().count(), 1);
        assert_eq!(fs::read_to_string(&json_path)?.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_bad_entry_leaves_dispatcher_untouched() {
        let json = r#"{ "filters": [
            { "tag": "mem", "level": "DEBUG", "type": "memory" },
            { "tag": "bad", "level": "LOUD", "type": "memory" }
        ] }"#;

        let log = Dispatcher::new();
        let err = log.load_configuration_str(json).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
        assert_eq!(log.filter_count(), 0);
    }

    /// Writer that counts how often it is closed
    struct CountingWriter(Arc<AtomicUsize>);

    impl LogWriter for CountingWriter {
        fn write(&mut self, _record: &crate::core::LogRecord) -> Result<bool> {
            Ok(true)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_failed_load_closes_writers_already_built() {
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let mut registry = WriterRegistry::with_builtins();
        registry.register("counting", move |_| Ok(Box::new(CountingWriter(Arc::clone(&counter)))));

        let json = r#"{ "filters": [
            { "tag": "first", "level": "DEBUG", "type": "counting" },
            { "tag": "second", "level": "INFO", "type": "counting" },
            { "tag": "broken", "level": "LOUD", "type": "counting" }
        ] }"#;

        let log = Dispatcher::new();
        let err = log.load_configuration_with(json, &registry).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
        assert_eq!(closes.load(Ordering::SeqCst), 2);
        assert_eq!(log.filter_count(), 0);
    }

    #[test]
    fn test_buffered_writer_reports_to_dispatcher_handler() -> Result<()> {
        struct Failing;
        impl LogWriter for Failing {
            fn write(&mut self, _record: &crate::core::LogRecord) -> Result<bool> {
                Err(LoggerError::writer("unplugged"))
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "failing"
            }
        }

        let mut registry = WriterRegistry::empty();
        registry.register("failing", |_| Ok(Box::new(Failing)));
        let reported = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let log = Dispatcher::builder()
            .on_writer_error(Arc::new(move |name: &str, err: &LoggerError| {
                sink.lock().push(format!("{}: {}", name, err));
            }))
            .build();

        log.load_configuration_with(
            r#"{ "filters": [ { "tag": "q", "level": "INFO", "type": "failing",
                 "properties": { "buffered": "8", "overflow": "block" } } ] }"#,
            &registry,
        )?;
        log.info("lost");
        log.flush()?;

        assert_eq!(*reported.lock(), vec!["failing: Writer error: unplugged"]);
        Ok(())
    }

    #[test]
    fn test_unknown_kind() {
        let json = r#"{ "filters": [ { "tag": "x", "level": "INFO", "type": "carrier-pigeon" } ] }"#;
        let err = Dispatcher::new().load_configuration_str(json).unwrap_err();
        assert!(matches!(err, LoggerError::UnknownWriterKind { .. }));
    }

    #[test]
    fn test_missing_tag_and_duplicates() {
        let missing = r#"{ "filters": [ { "level": "INFO", "type": "memory" } ] }"#;
        let err = Dispatcher::new().load_configuration_str(missing).unwrap_err();
        assert!(err.to_string().contains("tag"));

        let dup = r#"{ "filters": [
            { "tag": "a", "level": "INFO", "type": "memory" },
            { "tag": "a", "level": "ERROR", "type": "memory" }
        ] }"#;
        let err = Dispatcher::new().load_configuration_str(dup).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_missing_required_property() {
        let json = r#"{ "filters": [ { "tag": "f", "level": "INFO", "type": "file" } ] }"#;
        let err = Dispatcher::new().load_configuration_str(json).unwrap_err();
        assert!(err.to_string().contains("filename"), "{}", err);
    }

    #[test]
    fn test_buffered_wraps_in_channel() -> Result<()> {
        let json = r#"{ "filters": [
            { "tag": "mem", "level": "INFO", "type": "memory",
              "properties": { "buffered": "16", "overflow": "block" } }
        ] }"#;
        let entry = &ConfigFile::from_json(json)?.filters[0];
        let writer = WriterRegistry::with_builtins().build(entry)?;
        assert_eq!(writer.name(), "channel(memory)");
        Ok(())
    }

    #[test]
    fn test_custom_kind() -> Result<()> {
        let mut registry = WriterRegistry::empty();
        registry.register("Ring", |props| Ok(Box::new(MemoryWriter::new(props.parse_or("size", 4)?))));

        let log = Dispatcher::new();
        log.load_configuration_with(
            r#"{ "filters": [ { "tag": "r", "level": "TRACE", "type": "ring" } ] }"#,
            &registry,
        )?;
        assert_eq!(log.threshold_of("r"), Some(LogLevel::Trace));
        Ok(())
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = Dispatcher::new()
            .load_configuration_file("/definitely/not/here.json")
            .unwrap_err();
        assert!(err.to_string().contains("reading configuration"));
    }
}
