use super::*;

/// A node of the value graph handed to the [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Any integer in -2^64..=2^64-1, which covers every `i64` and `u64`.
    Integer(i128),
    Double(f64),
    Single(f32),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// Pairs in insertion order. If the keys are exactly `0, 1, .., n-1` the
    /// map is written as an array of its values.
    Map(Vec<(Value, Value)>),
    Bool(bool),
    Null,
    Undefined,
    /// An unassigned simple value (0..=19 or 32..=255).
    Simple(u8),
    Tagged(Box<Tagged>),
}

impl Value {
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// True if the keys are the integers `0..pairs.len()`, in order. An empty map
/// stays a map.
pub(crate) fn is_index_run(pairs: &[(Value, Value)]) -> bool {
    !pairs.is_empty()
        && pairs
            .iter()
            .enumerate()
            .all(|(idx, (k, _))| matches!(k, Value::Integer(i) if *i == idx as i128))
}

/// A tag number and the value it annotates.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    tag: u64,
    value: Value,
}

impl Tagged {
    pub fn new<V: Into<Value>>(tag: u64, value: V) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (u64, Value) {
        (self.tag, self.value)
    }
}

impl From<Tagged> for Value {
    fn from(value: Tagged) -> Self {
        Self::Tagged(Box::new(value))
    }
}

macro_rules! impl_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Integer(value as i128)
                }
            }
        )*
    };
}

impl_int_from!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, i128);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Single(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn index_run() {
        let pairs = |keys: &[Value]| -> Vec<(Value, Value)> {
            keys.iter().map(|k| (k.clone(), Value::Null)).collect()
        };

        assert!(!is_index_run(&pairs(&[])));
        assert!(is_index_run(&pairs(&[0.into(), 1.into()])));
        assert!(!is_index_run(&pairs(&[1.into(), 0.into()])));
        assert!(!is_index_run(&pairs(&[0.into(), 2.into()])));
        assert!(!is_index_run(&pairs(&["0".into()])));
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(u64::MAX), Value::Integer(u64::MAX as i128));
        assert_eq!(Value::from(-1i8), Value::Integer(-1));
        assert_eq!(Value::from(None::<u8>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
        assert_eq!(Value::from(&b"\x01"[..]), Value::Bytes([1].into()));

        let t = Tagged::new(32, "http://example.com");
        assert_eq!(t.tag(), 32);
        assert_eq!(t.value(), &Value::Text("http://example.com".into()));
    }
}
