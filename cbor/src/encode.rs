use super::*;
use core::{convert::Infallible, ops::Range};
use tracing::{debug, trace};
use value::is_index_run;

const BREAK: u8 = 0xFF;

/// Substitutes a concrete value for the payload of a tagged value.
///
/// Called exactly once per [`Tagged`] node, after the tag number has been
/// written and before the returned value is encoded in its place. The
/// replacer receives the tag number and the unwrapped payload, not the
/// [`Tagged`] node itself. Returning another [`Tagged`] value nests a further
/// tag, which counts against [`Options::max_depth`] like any other nesting.
/// Errors are returned to the caller as [`Error::Replacer`].
pub trait Replacer {
    type Error;

    fn replace(&self, tag: u64, value: Value) -> Result<Value, Self::Error>;
}

/// The default replacer: encodes the tagged payload unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Replacer for Identity {
    type Error = Infallible;

    fn replace(&self, _tag: u64, value: Value) -> Result<Value, Self::Error> {
        Ok(value)
    }
}

impl<F, E> Replacer for F
where
    F: Fn(u64, Value) -> Result<Value, E>,
{
    type Error = E;

    fn replace(&self, tag: u64, value: Value) -> Result<Value, Self::Error> {
        self(tag, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Encoder<R = Identity> {
    replacer: R,
    options: Options,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R> Encoder<R> {
    pub fn with_replacer<T: Replacer>(self, replacer: T) -> Encoder<T> {
        Encoder {
            replacer,
            options: self.options,
        }
    }

    pub fn with_options(self, options: Options) -> Self {
        Self { options, ..self }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<R: Replacer> Encoder<R> {
    /// Encode a single value into a newly allocated buffer.
    pub fn encode<V: Into<Value>>(&self, value: V) -> Result<Vec<u8>, Error<R::Error>> {
        let mut data = Vec::new();
        self.encode_into(value, &mut data)?;
        Ok(data)
    }

    /// Append the encoding of a value to `data`, returning the range written.
    ///
    /// Use this to build a CBOR sequence from several items. On failure `data`
    /// is restored to its original length.
    pub fn encode_into<V: Into<Value>>(
        &self,
        value: V,
        data: &mut Vec<u8>,
    ) -> Result<Range<usize>, Error<R::Error>> {
        let start = data.len();
        let mut packer = Packer {
            data: &mut *data,
            replacer: &self.replacer,
            options: &self.options,
            chunk_size: self.options.effective_chunk_size(),
            depth: 0,
        };
        match packer.emit(value.into()) {
            Ok(()) => Ok(start..data.len()),
            Err(e) => {
                debug!(
                    discarded = data.len() - start,
                    "Encode failed, discarding partial output"
                );
                data.truncate(start);
                Err(e)
            }
        }
    }
}

/// Encode a value with the identity replacer and default options.
pub fn encode<V: Into<Value>>(value: V) -> Result<Vec<u8>, Error> {
    Encoder::new().encode(value)
}

struct Packer<'a, R> {
    data: &'a mut Vec<u8>,
    replacer: &'a R,
    options: &'a Options,
    chunk_size: Option<usize>,
    depth: usize,
}

impl<R: Replacer> Packer<'_, R> {
    fn emit(&mut self, value: Value) -> Result<(), Error<R::Error>> {
        match value {
            Value::Integer(n) => self.emit_int(n),
            Value::Double(f) => {
                if f.is_nan() && self.options.nan == NanPolicy::Undefined {
                    self.data.push((7 << 5) | 23);
                } else {
                    self.data.push((7 << 5) | 27);
                    self.data.extend(f.to_be_bytes());
                }
                Ok(())
            }
            Value::Single(f) => {
                if f.is_nan() && self.options.nan == NanPolicy::Undefined {
                    self.data.push((7 << 5) | 23);
                } else {
                    self.data.push((7 << 5) | 26);
                    self.data.extend(f.to_be_bytes());
                }
                Ok(())
            }
            Value::Text(s) => {
                self.emit_text(&s);
                Ok(())
            }
            Value::Bytes(b) => {
                self.emit_bytes(&b);
                Ok(())
            }
            Value::Array(items) => self.emit_array(items),
            Value::Map(pairs) if is_index_run(&pairs) => {
                self.emit_array(pairs.into_iter().map(|(_, v)| v).collect())
            }
            Value::Map(pairs) => self.emit_map(pairs),
            Value::Bool(b) => {
                self.data.push((7 << 5) | if b { 21 } else { 20 });
                Ok(())
            }
            Value::Null => {
                self.data.push((7 << 5) | 22);
                Ok(())
            }
            Value::Undefined => {
                self.data.push((7 << 5) | 23);
                Ok(())
            }
            Value::Simple(n) => self.emit_simple(n),
            Value::Tagged(t) => self.emit_tagged(*t),
        }
    }

    fn emit_uint_minor(&mut self, major: u8, val: u64) {
        if val < 24 {
            self.data.push((major << 5) | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push((major << 5) | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push((major << 5) | 25u8);
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push((major << 5) | 26u8);
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push((major << 5) | 27u8);
            self.data.extend(val.to_be_bytes())
        }
    }

    fn emit_int(&mut self, n: i128) -> Result<(), Error<R::Error>> {
        let (major, arg) = if n >= 0 { (0, n) } else { (1, -1 - n) };
        let arg = u64::try_from(arg).map_err(|_| Error::IntegerOverflow(n))?;
        self.emit_uint_minor(major, arg);
        Ok(())
    }

    fn emit_definite(&mut self, major: u8, b: &[u8]) {
        self.emit_uint_minor(major, b.len() as u64);
        self.data.extend_from_slice(b)
    }

    fn emit_text(&mut self, s: &str) {
        let Some(chunk_size) = self.chunk_size.filter(|n| s.len() >= *n) else {
            return self.emit_definite(3, s.as_bytes());
        };

        trace!(len = s.len(), chunk_size, "Chunking text string");
        self.data.push((3 << 5) | 31);
        let mut rest = s;
        while !rest.is_empty() {
            // Back off to a character boundary, chunk_size is always >= 4
            let mut end = chunk_size.min(rest.len());
            while !rest.is_char_boundary(end) {
                end -= 1;
            }
            let (chunk, tail) = rest.split_at(end);
            self.emit_definite(3, chunk.as_bytes());
            rest = tail;
        }
        self.data.push(BREAK)
    }

    fn emit_bytes(&mut self, b: &[u8]) {
        let Some(chunk_size) = self.chunk_size.filter(|n| b.len() >= *n) else {
            return self.emit_definite(2, b);
        };

        trace!(len = b.len(), chunk_size, "Chunking byte string");
        self.data.push((2 << 5) | 31);
        for chunk in b.chunks(chunk_size) {
            self.emit_definite(2, chunk);
        }
        self.data.push(BREAK)
    }

    fn emit_simple(&mut self, n: u8) -> Result<(), Error<R::Error>> {
        match n {
            0..=19 => self.data.push((7 << 5) | n),
            20..=23 => {
                return Err(Error::UnsupportedValueKind(
                    "simple values 20-23 are bool, null and undefined",
                ));
            }
            24..=31 => return Err(Error::UnsupportedValueKind("reserved simple value")),
            _ => {
                self.data.push((7 << 5) | 24);
                self.data.push(n)
            }
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), Error<R::Error>> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn emit_array(&mut self, items: Vec<Value>) -> Result<(), Error<R::Error>> {
        self.enter()?;
        self.emit_uint_minor(4, items.len() as u64);
        for item in items {
            self.emit(item)?;
        }
        self.leave();
        Ok(())
    }

    fn emit_map(&mut self, pairs: Vec<(Value, Value)>) -> Result<(), Error<R::Error>> {
        self.enter()?;
        self.emit_uint_minor(5, pairs.len() as u64);
        for (k, v) in pairs {
            self.emit(k)?;
            self.emit(v)?;
        }
        self.leave();
        Ok(())
    }

    fn emit_tagged(&mut self, tagged: Tagged) -> Result<(), Error<R::Error>> {
        self.enter()?;
        let (tag, value) = tagged.into_parts();
        self.emit_uint_minor(6, tag);

        trace!(tag, "Applying replacer");
        let value = self.replacer.replace(tag, value).map_err(Error::Replacer)?;
        self.emit(value)?;
        self.leave();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_sequence_encode() {
        let e = Encoder::new();
        let mut data = Vec::new();
        assert_eq!(e.encode_into(1, &mut data), Ok(0..1));
        assert_eq!(e.encode_into("a", &mut data), Ok(1..3));
        assert_eq!(data, hex!("016161"));
    }
}
