/*!
Compose command - convert JSON to CBOR
*/

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use valcbor::{Encoder, NanPolicy, Options, Tagged, Value};

/// Output format for compose command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Raw CBOR bytes
    Binary,
    /// Hexadecimal text
    Hex,
}

/// Convert JSON to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to CBOR binary",
    long_about = "Parse a JSON document and encode it as CBOR.\n\n\
                  Objects keep their key order. An object of the form\n\
                  {\"@tag\": N, \"@value\": V} becomes a tagged value."
)]
pub struct Command {
    /// Output format
    #[arg(long, default_value = "binary", value_name = "FORMAT")]
    format: OutputFormat,

    /// Maximum nesting of arrays, maps and tags
    #[arg(long, default_value_t = Options::default().max_depth)]
    max_depth: usize,

    /// Strings of at least this many bytes are chunked (0 disables chunking)
    #[arg(long, default_value_t = Options::default().chunk_size)]
    chunk_size: usize,

    /// Write NaN as the simple value undefined
    #[arg(long)]
    nan_as_undefined: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Input JSON file (use '-' for stdin)
    input: PathBuf,
}

const STDIO: &str = "-";

impl Command {
    fn options(&self) -> Options {
        Options {
            max_depth: self.max_depth,
            chunk_size: self.chunk_size,
            nan: if self.nan_as_undefined {
                NanPolicy::Undefined
            } else {
                NanPolicy::Float
            },
        }
    }

    fn read_json(&self) -> anyhow::Result<serde_json::Value> {
        let reader: Box<dyn Read> = if self.input == Path::new(STDIO) {
            Box::new(io::stdin().lock())
        } else {
            Box::new(File::open(&self.input)?)
        };
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    fn write_cbor(&self, cbor_bytes: &[u8]) -> io::Result<()> {
        let rendered = render(self.format, cbor_bytes);
        match self.output.as_deref() {
            Some(path) if path != Path::new(STDIO) => std::fs::write(path, rendered),
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&rendered)?;
                stdout.flush()
            }
        }
    }

    pub fn exec(self) -> anyhow::Result<()> {
        let value = json_to_value(self.read_json()?)?;

        let options = self.options();
        tracing::debug!(?options, "Encoding");

        let cbor_bytes = Encoder::new()
            .with_options(options)
            .with_replacer(check_well_known_tag)
            .encode(value)?;
        tracing::info!("Encoded {} bytes", cbor_bytes.len());

        Ok(self.write_cbor(&cbor_bytes)?)
    }
}

/// Lay out the encoded bytes as requested; hex output is one lowercase line
fn render(format: OutputFormat, cbor_bytes: &[u8]) -> Vec<u8> {
    match format {
        OutputFormat::Binary => cbor_bytes.to_vec(),
        OutputFormat::Hex => (hex::encode(cbor_bytes) + "\n").into_bytes(),
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TagError {
    #[error("Tag {0} requires a text string")]
    ExpectedText(u64),

    #[error("Tag 1 requires a number")]
    ExpectedNumber,
}

/// Checks the payload type of the tags RFC 8949 defines for dates and URIs
fn check_well_known_tag(tag: u64, value: Value) -> Result<Value, TagError> {
    match tag {
        0 | 32 if !matches!(value, Value::Text(_)) => Err(TagError::ExpectedText(tag)),
        1 if !matches!(
            value,
            Value::Integer(_) | Value::Double(_) | Value::Single(_)
        ) =>
        {
            Err(TagError::ExpectedNumber)
        }
        _ => Ok(value),
    }
}

/// Convert a JSON value to a CBOR value
fn json_to_value(value: serde_json::Value) -> anyhow::Result<Value> {
    use serde_json::Value as J;

    Ok(match value {
        J::Null => Value::Null,
        J::Bool(b) => b.into(),

        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(u) = n.as_u64() {
                u.into()
            } else if let Some(f) = n.as_f64() {
                f.into()
            } else {
                anyhow::bail!("Invalid JSON number: {}", n)
            }
        }

        J::String(s) => s.into(),

        J::Array(arr) => {
            let items: Result<Vec<_>, _> = arr.into_iter().map(json_to_value).collect();
            Value::Array(items?)
        }

        J::Object(mut obj)
            if obj.len() == 2 && obj.contains_key("@tag") && obj.contains_key("@value") =>
        {
            let tag = obj
                .remove("@tag")
                .and_then(|t| t.as_u64())
                .ok_or_else(|| anyhow::anyhow!("@tag must be an unsigned integer"))?;
            let value = json_to_value(obj.remove("@value").unwrap_or_default())?;
            Tagged::new(tag, value).into()
        }

        J::Object(obj) => {
            let mut pairs = Vec::with_capacity(obj.len());
            for (key, val) in obj {
                pairs.push((Value::from(key), json_to_value(val)?));
            }
            Value::Map(pairs)
        }
    })
}
