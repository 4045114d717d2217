//! Catalog data types and their equivalence.
//!
//! The remote reports types in expanded form (`VARCHAR(16777216)`, `NUMBER(38,0)`) while
//! users write aliases (`STRING`, `INT`). Both sides parse into a [`DataType`] whose
//! equality compares the family and the fully-defaulted parameters.

use std::fmt;
use std::hash::{Hash, Hasher};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ProviderError, ProviderResult};

const MAX_VARCHAR_LENGTH: u32 = 134_217_728;
const DEFAULT_VARCHAR_LENGTH: u32 = 16_777_216;
const DEFAULT_BINARY_LENGTH: u32 = 8_388_608;
const DEFAULT_NUMBER_PRECISION: u32 = 38;
const DEFAULT_TIME_PRECISION: u32 = 9;

lazy_static! {
    static ref TYPE_SYNTAX: Regex =
        Regex::new(r"^([A-Z][A-Z0-9_]*(?:\s+[A-Z][A-Z0-9_]*)*)\s*(?:\(([^()]*)\))?$").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeFamily {
    Number,
    Float,
    Varchar,
    Binary,
    Boolean,
    Date,
    Time,
    TimestampLtz,
    TimestampNtz,
    TimestampTz,
    Variant,
    Object,
    Array,
    Geography,
    Geometry,
}

/// Parameter shape for a keyword: how many arguments it accepts and what they default to.
struct Shape {
    family: DataTypeFamily,
    max_args: usize,
    defaults: &'static [u32],
}

fn shape_of(keyword: &str) -> Option<Shape> {
    use DataTypeFamily::*;

    const NUMBER: &[u32] = &[DEFAULT_NUMBER_PRECISION, 0];
    const VARCHAR: &[u32] = &[DEFAULT_VARCHAR_LENGTH];
    const CHAR: &[u32] = &[1];
    const BINARY: &[u32] = &[DEFAULT_BINARY_LENGTH];
    const TIME: &[u32] = &[DEFAULT_TIME_PRECISION];

    let (family, max_args, defaults) = match keyword {
        "NUMBER" | "DECIMAL" | "DEC" | "NUMERIC" => (Number, 2, NUMBER),
        "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "BYTEINT" => (Number, 0, NUMBER),
        "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" | "REAL" => {
            (Float, 0, &[][..])
        }
        "VARCHAR" | "STRING" | "TEXT" | "NVARCHAR" | "NVARCHAR2" | "CHAR VARYING"
        | "NCHAR VARYING" => (Varchar, 1, VARCHAR),
        "CHAR" | "CHARACTER" | "NCHAR" => (Varchar, 1, CHAR),
        "BINARY" | "VARBINARY" => (Binary, 1, BINARY),
        "BOOLEAN" => (Boolean, 0, &[][..]),
        "DATE" => (Date, 0, &[][..]),
        "TIME" => (Time, 1, TIME),
        "DATETIME" | "TIMESTAMP" | "TIMESTAMP_NTZ" | "TIMESTAMP WITHOUT TIME ZONE" => {
            (TimestampNtz, 1, TIME)
        }
        "TIMESTAMP_LTZ" | "TIMESTAMP WITH LOCAL TIME ZONE" => (TimestampLtz, 1, TIME),
        "TIMESTAMP_TZ" | "TIMESTAMP WITH TIME ZONE" => (TimestampTz, 1, TIME),
        "VARIANT" => (Variant, 0, &[][..]),
        "OBJECT" => (Object, 0, &[][..]),
        "ARRAY" => (Array, 0, &[][..]),
        "GEOGRAPHY" => (Geography, 0, &[][..]),
        "GEOMETRY" => (Geometry, 0, &[][..]),
        _ => return None,
    };
    Some(Shape {
        family,
        max_args,
        defaults,
    })
}

/// A parsed data type.
#[derive(Debug, Clone)]
pub struct DataType {
    keyword: String,
    family: DataTypeFamily,
    args: Vec<u32>,
    canonical: Vec<u32>,
}

impl DataType {
    /// Parse a data-type string as written by users or reported by the remote.
    pub fn parse(input: &str) -> ProviderResult<Self> {
        let normalized = input.trim().to_ascii_uppercase();
        let invalid =
            |reason: String| ProviderError::invalid("data_type", format!("{input:?}: {reason}"));

        let caps = TYPE_SYNTAX
            .captures(&normalized)
            .ok_or_else(|| invalid("not a data type".to_string()))?;
        let keyword = WHITESPACE.replace_all(&caps[1], " ").into_owned();
        let shape = shape_of(&keyword).ok_or_else(|| invalid(format!("unknown type {keyword}")))?;

        let args = match caps.get(2) {
            None => Vec::new(),
            Some(raw) => raw
                .as_str()
                .split(',')
                .map(|a| {
                    a.trim()
                        .parse::<u32>()
                        .map_err(|_| invalid(format!("bad type parameter {:?}", a.trim())))
                })
                .collect::<ProviderResult<Vec<_>>>()?,
        };
        if args.len() > shape.max_args {
            return Err(invalid(format!(
                "{keyword} takes at most {} parameter(s)",
                shape.max_args
            )));
        }

        let mut canonical = shape.defaults.to_vec();
        // NUMBER(p) keeps the default scale of 0.
        for (slot, value) in canonical.iter_mut().zip(&args) {
            *slot = *value;
        }
        check_ranges(shape.family, &canonical).map_err(invalid)?;

        Ok(Self {
            keyword,
            family: shape.family,
            args,
            canonical,
        })
    }

    pub fn family(&self) -> DataTypeFamily {
        self.family
    }

    /// Parameters with defaults applied.
    pub fn canonical_params(&self) -> &[u32] {
        &self.canonical
    }

    /// The user's spelling, upper-cased, with explicit parameters only.
    pub fn to_sql(&self) -> String {
        if self.args.is_empty() {
            self.keyword.clone()
        } else {
            let args: Vec<String> = self.args.iter().map(u32::to_string).collect();
            format!("{}({})", self.keyword, args.join(","))
        }
    }

    pub fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

fn check_ranges(family: DataTypeFamily, params: &[u32]) -> Result<(), String> {
    match family {
        DataTypeFamily::Number => {
            let (precision, scale) = (params[0], params[1]);
            if !(1..=38).contains(&precision) {
                return Err(format!("precision {precision} out of range 1..=38"));
            }
            if scale > precision {
                return Err(format!("scale {scale} exceeds precision {precision}"));
            }
        }
        DataTypeFamily::Varchar | DataTypeFamily::Binary => {
            if params[0] == 0 || params[0] > MAX_VARCHAR_LENGTH {
                return Err(format!("length {} out of range", params[0]));
            }
        }
        DataTypeFamily::Time
        | DataTypeFamily::TimestampLtz
        | DataTypeFamily::TimestampNtz
        | DataTypeFamily::TimestampTz => {
            if params[0] > 9 {
                return Err(format!("fractional precision {} out of range 0..=9", params[0]));
            }
        }
        _ => {}
    }
    Ok(())
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.canonical == other.canonical
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.canonical.hash(state);
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl std::str::FromStr for DataType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// True when both strings parse and name the same type. Unparseable input is compared
/// case-insensitively so a bad value still produces a visible diff.
pub fn equivalent(a: &str, b: &str) -> bool {
    match (DataType::parse(a), DataType::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}
