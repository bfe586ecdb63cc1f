use crate::bind::Item;

/// Snapshot of a target record, captured through its `Serialize` impl.
///
/// Items are written into the snapshot as lines are bound, then the record is
/// rebuilt from it through `Deserialize`.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    String(String),
    Integer(i128, Width),
    Float(f64),
    Boolean(bool),
    Char(char),
    Null,
    Array(Vec<Value>),
    Map(Vec<(String, Value)>),
    Struct {
        name: &'static str,
        fields: Vec<(&'static str, Value)>,
    },
    Variant(&'static str),
    /// Text bound to a field whose type the snapshot cannot tell, i.e. an
    /// empty `Option`. Converted when the record is rebuilt.
    Raw(Item),
}

/// Declared width of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl Value {
    /// Shape name used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(..) => "int",
            Self::Float(_) => "float",
            Self::Boolean(_) => "bool",
            Self::Char(_) => "char",
            Self::Null => "unit",
            Self::Array(_) => "sequence",
            Self::Map(_) => "map",
            Self::Struct { .. } => "struct",
            Self::Variant(_) => "enum",
            Self::Raw(_) => "text",
        }
    }
}

impl Width {
    /// Parses base-10 `text` into this width, widened to `i128`.
    pub(crate) fn parse(self, text: &str) -> Option<i128> {
        match self {
            Self::I8 => text.parse::<i8>().ok().map(i128::from),
            Self::I16 => text.parse::<i16>().ok().map(i128::from),
            Self::I32 => text.parse::<i32>().ok().map(i128::from),
            Self::I64 => text.parse::<i64>().ok().map(i128::from),
            Self::I128 => text.parse::<i128>().ok(),
            Self::U8 => text.parse::<u8>().ok().map(i128::from),
            Self::U16 => text.parse::<u16>().ok().map(i128::from),
            Self::U32 => text.parse::<u32>().ok().map(i128::from),
            Self::U64 => text.parse::<u64>().ok().map(i128::from),
            Self::U128 => text
                .parse::<u128>()
                .ok()
                .and_then(|value| i128::try_from(value).ok()),
        }
    }
}
