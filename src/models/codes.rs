//! Integer classification codes carried as membership sets.
//!
//! Decoded records do not carry a single type per field: a record, attribute or segment may be
//! tagged with several codes at once, and filters only ask whether a code belongs to the set.
use serde::de::{Deserializer, Error as DeError, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// An ordered set of classification codes.
///
/// Serialized as a list of integers. Deserialization is lenient and accepts:
/// - a list of integers: `[13]`
/// - a single integer: `13`
/// - a map keyed by decimal codes (values ignored): `{"13": "TABLE_DUMP_V2"}`
///
/// Anything else, including entries that are not codes, decodes to nothing rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodeSet(BTreeSet<u32>);

impl CodeSet {
    pub fn new() -> Self {
        CodeSet(BTreeSet::new())
    }

    /// Builds a set from a list of codes.
    pub fn of(codes: &[u32]) -> Self {
        codes.iter().copied().collect()
    }

    pub fn contains(&self, code: u32) -> bool {
        self.0.contains(&code)
    }

    /// Returns true if any of the given codes belongs to this set.
    pub fn contains_any(&self, codes: &CodeSet) -> bool {
        !self.0.is_disjoint(&codes.0)
    }

    pub fn insert(&mut self, code: u32) -> bool {
        self.0.insert(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for CodeSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        CodeSet(iter.into_iter().collect())
    }
}

impl Display for CodeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", code)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for CodeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for CodeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CodeSetVisitor)
    }
}

/// A single code, or `None` for a value that is not a valid code.
struct LenientCode(Option<u32>);

impl<'de> Deserialize<'de> for LenientCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientCodeVisitor)
    }
}

struct LenientCodeVisitor;

impl<'de> Visitor<'de> for LenientCodeVisitor {
    type Value = LenientCode;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "an integer code")
    }

    fn visit_bool<E: DeError>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(LenientCode(None))
    }

    fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LenientCode(u32::try_from(v).ok()))
    }

    fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        Ok(LenientCode(u32::try_from(v).ok()))
    }

    fn visit_f64<E: DeError>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(LenientCode(None))
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
        Ok(LenientCode(v.trim().parse::<u32>().ok()))
    }

    fn visit_unit<E: DeError>(self) -> Result<Self::Value, E> {
        Ok(LenientCode(None))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LenientCode(None))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LenientCode(None))
    }
}

struct CodeSetVisitor;

impl<'de> Visitor<'de> for CodeSetVisitor {
    type Value = CodeSet;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "a code, a list of codes or a map keyed by codes")
    }

    fn visit_bool<E: DeError>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(CodeSet::new())
    }

    fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        Ok(u32::try_from(v).into_iter().collect())
    }

    fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        Ok(u32::try_from(v).into_iter().collect())
    }

    fn visit_f64<E: DeError>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(CodeSet::new())
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.trim().parse::<u32>().into_iter().collect())
    }

    fn visit_unit<E: DeError>(self) -> Result<Self::Value, E> {
        Ok(CodeSet::new())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut codes = CodeSet::new();
        while let Some(LenientCode(code)) = seq.next_element()? {
            codes.0.extend(code);
        }
        Ok(codes)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut codes = CodeSet::new();
        while let Some((LenientCode(code), IgnoredAny)) = map.next_entry()? {
            codes.0.extend(code);
        }
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let codes = CodeSet::of(&[13, 16]);
        assert!(codes.contains(13));
        assert!(codes.contains(16));
        assert!(!codes.contains(12));
        assert!(codes.contains_any(&CodeSet::of(&[1, 16])));
        assert!(!codes.contains_any(&CodeSet::of(&[1, 2])));
        assert_eq!(codes.to_string(), "{13,16}");
    }

    #[test]
    fn test_deserialize_shapes() {
        let codes: CodeSet = serde_json::from_str("[13, 4]").unwrap();
        assert_eq!(codes, CodeSet::of(&[4, 13]));

        let codes: CodeSet = serde_json::from_str("13").unwrap();
        assert_eq!(codes, CodeSet::of(&[13]));

        let codes: CodeSet = serde_json::from_str(r#"{"13": "TABLE_DUMP_V2"}"#).unwrap();
        assert_eq!(codes, CodeSet::of(&[13]));

        let codes: CodeSet = serde_json::from_str(r#"{"2": "AS_SEQUENCE", "x": 1}"#).unwrap();
        assert_eq!(codes, CodeSet::of(&[2]));
    }

    #[test]
    fn test_deserialize_garbage_is_empty() {
        for input in [
            "null",
            "true",
            "1.5",
            "-3",
            r#""abc""#,
            r#"[[1], {"a": 2}, "x", -1]"#,
        ] {
            let codes: CodeSet = serde_json::from_str(input).unwrap();
            assert!(codes.is_empty(), "{} should decode to an empty set", input);
        }
    }

    #[test]
    fn test_serialize() {
        let codes = CodeSet::of(&[10, 4]);
        assert_eq!(serde_json::to_string(&codes).unwrap(), "[4,10]");
    }
}
