//! Purpose: Render a `Value` tree as compact or pretty JSON, optionally ANSI-colored.
//! Exports: `EncodeOptions`, `TimestampMode`, `write_value`, `to_display_string`.
//! Role: Generic structural encoder behind `Codec::encode` and `Value`'s Display.
//! Invariants: Pretty output without color equals serde_json::to_string_pretty for plain values.
//! Invariants: ANSI escapes appear only when explicitly enabled.
//! Invariants: Nothing is returned on failure; the buffer is discarded by the caller.
use crate::api::TypedHook;
use crate::core::error::{Error, ErrorKind};
use crate::core::value::{Mapping, Value};

const INDENT: &str = "  ";

// Conservative 8/16-color palette for broad terminal compatibility.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EncodeOptions {
    /// Drop mapping entries whose value is null instead of writing `null`.
    pub omit_empty_optionals: bool,
    pub pretty: bool,
    pub color: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// How `Value::Timestamp` leaves are converted to text.
#[derive(Clone, Copy)]
pub enum TimestampMode<'a> {
    Hook(&'a dyn TypedHook),
    /// No conversion registered; any timestamp leaf fails the encode.
    Missing,
    /// Display-only rendering with the value's own offset.
    Display,
}

pub fn write_value(
    value: &Value,
    options: &EncodeOptions,
    timestamps: TimestampMode<'_>,
) -> Result<String, Error> {
    let mut writer = Writer {
        options,
        timestamps,
        out: String::new(),
    };
    writer.value(value, 0)?;
    Ok(writer.out)
}

pub(crate) fn to_display_string(value: &Value) -> String {
    write_value(value, &EncodeOptions::default(), TimestampMode::Display)
        .unwrap_or_else(|err| format!("<{err}>"))
}

struct Writer<'a> {
    options: &'a EncodeOptions,
    timestamps: TimestampMode<'a>,
    out: String,
}

impl Writer<'_> {
    fn value(&mut self, value: &Value, indent: usize) -> Result<(), Error> {
        match value {
            Value::Null => self.colored("null", COLOR_NULL),
            Value::Bool(val) => self.colored(if *val { "true" } else { "false" }, COLOR_BOOL),
            Value::Number(num) => self.colored(num.as_str(), COLOR_NUMBER),
            Value::Text(text) => self.string(text, COLOR_STRING)?,
            Value::Sequence(items) => self.sequence(items, indent)?,
            Value::Mapping(map) => self.mapping(map, indent)?,
            Value::Timestamp(ts) => {
                let text = match self.timestamps {
                    TimestampMode::Hook(hook) => hook.encode(value)?,
                    TimestampMode::Display => ts.to_string(),
                    TimestampMode::Missing => {
                        return Err(Error::new(ErrorKind::Encode)
                            .with_message("no conversion registered for timestamp values")
                            .with_hint("Register a timestamp hook on the codec builder."));
                    }
                };
                self.string(&text, COLOR_STRING)?;
            }
        }
        Ok(())
    }

    fn sequence(&mut self, items: &[Value], indent: usize) -> Result<(), Error> {
        if items.is_empty() {
            self.colored("[]", COLOR_PUNCT);
            return Ok(());
        }
        self.colored("[", COLOR_PUNCT);
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.colored(",", COLOR_PUNCT);
            }
            self.newline(indent + 1);
            self.value(item, indent + 1)
                .map_err(|err| err.with_field(format!("[{idx}]")))?;
        }
        self.newline(indent);
        self.colored("]", COLOR_PUNCT);
        Ok(())
    }

    fn mapping(&mut self, map: &Mapping, indent: usize) -> Result<(), Error> {
        let omit = self.options.omit_empty_optionals;
        let mut entries = map.iter().filter(|(_, value)| !(omit && value.is_null())).peekable();
        if entries.peek().is_none() {
            self.colored("{}", COLOR_PUNCT);
            return Ok(());
        }
        self.colored("{", COLOR_PUNCT);
        let mut first = true;
        for (key, value) in entries {
            if !first {
                self.colored(",", COLOR_PUNCT);
            }
            first = false;
            self.newline(indent + 1);
            self.string(key, COLOR_KEY)?;
            self.colored(":", COLOR_PUNCT);
            if self.options.pretty {
                self.out.push(' ');
            }
            self.value(value, indent + 1)
                .map_err(|err| err.with_field(key))?;
        }
        self.newline(indent);
        self.colored("}", COLOR_PUNCT);
        Ok(())
    }

    fn string(&mut self, text: &str, color: &str) -> Result<(), Error> {
        let encoded = serde_json::to_string(text).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("string escape failed")
                .with_source(err)
        })?;
        self.colored(&encoded, color);
        Ok(())
    }

    fn newline(&mut self, level: usize) {
        if !self.options.pretty {
            return;
        }
        self.out.push('\n');
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn colored(&mut self, text: &str, color: &str) {
        if !self.options.color {
            self.out.push_str(text);
            return;
        }
        self.out.push_str("\u{1b}[");
        self.out.push_str(color);
        self.out.push('m');
        self.out.push_str(text);
        self.out.push_str("\u{1b}[0m");
    }
}
