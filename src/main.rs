//! Purpose: `tzjson` demo entry point replaying the codec's behavioural scenarios.
//! Role: Binary crate root; takes no arguments and prints one line per observation on stdout.
//! Invariants: Expected per-scenario failures are printed on stdout as `error: {json}`.
//! Invariants: Unexpected failures are emitted as JSON on stderr; exit code comes from `to_exit_code`.
//! Invariants: Logging goes to stderr via tracing, filtered by RUST_LOG (default `info`).
use std::error::Error as StdError;

use serde_json::{Map, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tzjson::api::{
    Codec, CodecBuilder, EncodeOptions, Error, Mapping, Timestamp, TypedRecord, Value,
    to_exit_code,
};

const RELOAD_SYNC: &str = r#"{"action":"reload","rev":47,"numItems":4,"items":[{"key":"currentSession","value":{"beginTime":"2019-04-17T06:58:08.206Z","deviceId":33747,"homeId":1548,"schemaMap":{"ACCELEROMETER":3,"OBDII":5,"PEMOTION":4,"SEAT_SENSOR_WAVE":2,"VEHICLE_LOCATION":1,"VIDEO":6},"sessionId":40,"timestamp":"2019-04-17T15:53:22.369+09:00"},"modificationTime":"2019-04-17T08:44:18.729Z"},{"key":"desiredCurrentSession","value":{"beginTime":"2019-05-09T23:57:42.984Z","deviceId":33747,"homeId":1548,"schemaMap":{"AccelerometerSchema":2,"VEHICLE_LOCATION":1},"sessionId":113,"timestamp":"2019-05-09T23:57:41.788Z"},"modificationTime":"2019-05-09T23:57:42.981Z"},{"key":"firmwareVersion","value":{"current":""},"modificationTime":"2019-04-17T08:44:18.883Z"},{"key":"lastLocation","value":{"latitude":37.326555,"longitude":-122.039915},"modificationTime":"2019-04-17T08:51:14.785Z"}]}"#;

const DELETE_SYNC: &str = r#"{"action":"delete","rev":48,"key":"desiredCurrentSession"}"#;

const SET_SYNC: &str = r#"{"action":"set","rev":49,"key":"desiredCurrentSession","value":{"beginTime":"2019-05-10T18:58:03.595Z","deviceId":33747,"homeId":1548,"schemaMap":{"AccelerometerSchema":2,"VEHICLE_LOCATION":1},"sessionId":121,"timestamp":"2019-05-10T18:58:02.345Z"}}"#;

const RECORD_SAMPLES: [&str; 4] = [
    r#"{"name":"test","body":[1,2,3],"createdAt":"2019-05-11T00:30:35.645660Z"}"#,
    r#"{"name":"test","body":[1,2,3],"createdAt":"2019-05-11T00:30:35.645Z"}"#,
    r#"{"name":"test","body":[1,2,3],"createdAt":"2019-05-11T00:30:35Z"}"#,
    r#"{"name":"test","body":[1,2,3],"createdAt":"2019-05-11T00:30:35.645660Z[UTC]"}"#,
];

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<(), Error> {
    let codec = Codec::shared();
    let options = EncodeOptions::default();
    info!(tags = ?codec.tags().collect::<Vec<_>>(), "demo starting");

    for sync in [RELOAD_SYNC, DELETE_SYNC, SET_SYNC] {
        inspect_sync(codec, sync)?;
    }

    let now = Timestamp::now_utc();
    println!(
        "{}",
        TypedRecord::new("test", vec![1, 2, 3])
            .with_created_at(now)
            .encode(codec, &options)?
    );
    println!(
        "{}",
        TypedRecord::new("test", vec![1, 2, 3]).encode(codec, &options)?
    );

    let generic: Mapping = [("foo", Value::from("foo")), ("time", Value::from(now))]
        .into_iter()
        .collect();
    let generic = Value::Mapping(generic);
    println!("{}", codec.encode(&generic, &options)?);
    let bare = CodecBuilder::new().build();
    match bare.encode(&generic, &options) {
        Ok(text) => println!("{text}"),
        Err(err) => println!("error: {}", error_json(&err)),
    }

    for sample in RECORD_SAMPLES {
        match TypedRecord::decode(codec, sample) {
            Ok(record) => println!("{record}"),
            Err(err) => println!("error: {}", error_json(&err)),
        }
    }
    Ok(())
}

fn inspect_sync(codec: &Codec, text: &str) -> Result<(), Error> {
    let decoded = codec.decode(text)?;

    if decoded.get("hoge") == Some(&Value::from("hoge")) {
        println!("oops!?");
    } else {
        println!("yes");
    }

    let null = Value::Null;
    let action = decoded.get("action").unwrap_or(&null);
    println!("action: {action} ({})", action.kind_name());

    if action.as_str() == Some("reload") {
        let rev = decoded.get("rev").unwrap_or(&null);
        println!("   rev is {rev} ({})", rev.kind_name());

        let items = decoded.get("items").unwrap_or(&null);
        println!("   items is {items} ({})", items.kind_name());

        for item in items.cast::<Vec<Value>>()? {
            println!("        item is {item} ({})", item.kind_name());
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn emit_error(err: &Error) {
    eprintln!("{}", error_json(err));
}

fn error_json(err: &Error) -> serde_json::Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("unknown error")),
    );
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some((line, column)) = err.position() {
        inner.insert("line".to_string(), json!(line));
        inner.insert("column".to_string(), json!(column));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }
    json!({ "error": inner })
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        causes.push(source.to_string());
        current = source.source();
    }
    causes
}
