#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::{
    bind::{Binder, Item, check_tags},
    error::{Error, Result},
    options::Options,
    ser::to_value,
    value::{Value, Width},
};
use serde::{
    Serialize,
    de::{
        self, DeserializeOwned, Deserializer as _, Error as _, IntoDeserializer,
        value::StrDeserializer,
    },
    forward_to_deserialize_any,
};
use std::str::FromStr;
use tracing::debug;

/// Reads INI text into a fresh `T::default()`.
///
/// # Errors
///
/// See [`from_str_into`].
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    from_str_with_options(s, Options::default())
}

/// Same as [`from_str`], with explicit [`Options`].
///
/// # Errors
///
/// See [`from_str_into_with_options`].
pub fn from_str_with_options<T>(s: &str, options: Options) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    let mut record = T::default();
    from_str_into_with_options(s, &mut record, options)?;
    Ok(record)
}

/// Populates `target` from INI text.
///
/// `target` must be a struct whose fields are section records, each tagged by
/// its serialized name. Only the fields named by the input are written; the
/// rest keep their current value. When a line fails, the writes made by the
/// lines before it stay in `target`.
///
/// # Errors
///
/// Returns an error if `target` is not a struct, a line is malformed, an item
/// has no active section, or a value does not convert to its field's type.
pub fn from_str_into<T>(s: &str, target: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    from_str_into_with_options(s, target, Options::default())
}

/// Same as [`from_str_into`], with explicit [`Options`].
///
/// # Errors
///
/// See [`from_str_into`]. With `strict_tags`, duplicate tags are rejected
/// before any line is read.
pub fn from_str_into_with_options<T>(s: &str, target: &mut T, options: Options) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let (name, mut sections) = match to_value(&*target)? {
        Value::Struct { name, fields } => (name, fields),
        other => return Err(Error::InvalidTarget { found: other.kind() }),
    };

    if options.strict_tags {
        check_tags(name, &sections)?;
    }

    debug!(record = name, sections = sections.len(), "binding");
    let bound = Binder::new(&mut sections, options).bind(s);

    let record = Value::Struct {
        name,
        fields: sections,
    };
    match T::deserialize(ValueDeserializer { value: record }) {
        Ok(record) => {
            *target = record;
            bound
        }
        Err(err) => bound.and(Err(err)),
    }
}

/// Reads raw bytes, decoded lossily as UTF-8, into a fresh `T::default()`.
///
/// # Errors
///
/// See [`from_str_into`].
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    from_slice_with_options(bytes, Options::default())
}

/// Same as [`from_slice`], with explicit [`Options`].
///
/// # Errors
///
/// See [`from_str_into_with_options`].
pub fn from_slice_with_options<T>(bytes: &[u8], options: Options) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    from_str_with_options(&String::from_utf8_lossy(bytes), options)
}

/// Populates `target` from raw bytes, decoded lossily as UTF-8.
///
/// # Errors
///
/// See [`from_str_into`].
pub fn from_slice_into<T>(bytes: &[u8], target: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    from_slice_into_with_options(bytes, target, Options::default())
}

/// Same as [`from_slice_into`], with explicit [`Options`].
///
/// # Errors
///
/// See [`from_str_into_with_options`].
pub fn from_slice_into_with_options<T>(
    bytes: &[u8],
    target: &mut T,
    options: Options,
) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    from_str_into_with_options(&String::from_utf8_lossy(bytes), target, options)
}

/// Rebuilds a record from its (possibly updated) snapshot.
struct ValueDeserializer {
    value: Value,
}

fn visit_integer<'de, V>(value: i128, width: Width, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match width {
        Width::I8 | Width::I16 | Width::I32 | Width::I64 => visitor.visit_i64(value as i64),
        Width::U8 | Width::U16 | Width::U32 | Width::U64 => visitor.visit_u64(value as u64),
        Width::I128 => visitor.visit_i128(value),
        Width::U128 => visitor.visit_u128(value as u128),
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(value, width) => visit_integer(value, width, visitor),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Char(c) => visitor.visit_char(c),
            Value::Null => visitor.visit_unit(),
            Value::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Map(entries) => visitor.visit_map(MapDeserializer::new(entries)),
            Value::Struct { fields, .. } => visitor.visit_map(MapDeserializer::new(fields)),
            Value::Variant(variant) => visitor.visit_enum(variant.into_deserializer()),
            Value::Raw(item) => RawDeserializer { item }.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            Value::Raw(item) => visitor.visit_some(RawDeserializer { item }),
            value => visitor.visit_some(ValueDeserializer { value }),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            value => ValueDeserializer { value }.deserialize_any(visitor),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct identifier
    }
}

// Sequence deserializer for arrays
struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(values: Vec<Value>) -> Self {
        Self {
            iter: values.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer { value }).map(Some),
            None => Ok(None),
        }
    }
}

// Map deserializer for maps and structs
struct MapDeserializer<K> {
    iter: std::vec::IntoIter<(K, Value)>,
    value: Option<Value>,
}

impl<K> MapDeserializer<K> {
    fn new(entries: Vec<(K, Value)>) -> Self {
        Self {
            iter: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de, K> de::MapAccess<'de> for MapDeserializer<K>
where
    K: AsRef<str>,
{
    type Error = Error;

    fn next_key_seed<S>(&mut self, seed: S) -> Result<Option<S::Value>>
    where
        S: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(StrDeserializer::new(key.as_ref())).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<S>(&mut self, seed: S) -> Result<S::Value>
    where
        S: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer { value }),
            None => Err(Error::custom("map value requested before its key")),
        }
    }
}

/// Converts the text of an item into a field type the snapshot could not
/// tell in advance.
struct RawDeserializer {
    item: Item,
}

impl RawDeserializer {
    fn parse<T: FromStr>(&self, expected: &'static str) -> Result<T> {
        self.item
            .value
            .parse()
            .map_err(|_| self.item.conversion(expected))
    }
}

macro_rules! deserialize_int {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            let value = self.parse::<$ty>("int")?;
            visitor.$visit(value)
        }
    )*};
}

macro_rules! unsupported {
    ($($method:ident => $ty:literal),* $(,)?) => {$(
        fn $method<V>(self, _visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            Err(self.item.unsupported($ty))
        }
    )*};
}

impl<'de> de::Deserializer<'de> for RawDeserializer {
    type Error = Error;

    deserialize_int! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let value = self.parse::<f64>("float")?;
        visitor.visit_f32(value as f32)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let value = self.parse::<f64>("float")?;
        visitor.visit_f64(value)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(&self.item.value)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.item.value)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    unsupported! {
        deserialize_any => "any",
        deserialize_bool => "bool",
        deserialize_char => "char",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_map => "map",
        deserialize_identifier => "identifier",
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.item.unsupported("unit struct"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.item.unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.item.unsupported("tuple struct"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.item.unsupported("struct"))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.item.unsupported("enum"))
    }
}
