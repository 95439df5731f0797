//! Textual compression specifications: `name[,level]` or
//! `auto,name[,level]`.
//!
//! A spec is parsed once at configuration time and resolved into codec
//! adapters as often as needed. Its [`Display`](fmt::Display) form is
//! canonical (defaults spelled out) and is also what serde reads and writes,
//! so a spec can live in a config file as a plain string.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CompressError, Result};
use crate::format::{
    CodecKind, DEFAULT_LEVEL_LZMA, DEFAULT_LEVEL_ZLIB, DEFAULT_LEVEL_ZSTD, LZMA_LEVELS,
    ZLIB_LEVELS, ZSTD_LEVELS,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompressionSpec {
    None,
    Lz4,
    Zlib { level: u32 },
    Lzma { level: u32 },
    Zstd { level: i32 },
    /// Adaptive mode; the boxed spec is the target used for compressible data.
    Auto(Box<CompressionSpec>),
}

impl CompressionSpec {
    pub fn name(&self) -> &'static str {
        match self {
            CompressionSpec::Auto(_) => "auto",
            other => other.kind().map_or("auto", CodecKind::name),
        }
    }

    /// The codec this spec compresses with, `None` for `auto`.
    pub fn kind(&self) -> Option<CodecKind> {
        match self {
            CompressionSpec::None => Some(CodecKind::None),
            CompressionSpec::Lz4 => Some(CodecKind::Lz4),
            CompressionSpec::Zlib { .. } => Some(CodecKind::Zlib),
            CompressionSpec::Lzma { .. } => Some(CodecKind::Lzma),
            CompressionSpec::Zstd { .. } => Some(CodecKind::Zstd),
            CompressionSpec::Auto(_) => None,
        }
    }

    pub fn level(&self) -> Option<i32> {
        match self {
            CompressionSpec::Zlib { level } | CompressionSpec::Lzma { level } => {
                Some(*level as i32)
            }
            CompressionSpec::Zstd { level } => Some(*level),
            _ => None,
        }
    }

    /// Nested target of an `auto` spec.
    pub fn inner(&self) -> Option<&CompressionSpec> {
        match self {
            CompressionSpec::Auto(inner) => Some(inner),
            _ => None,
        }
    }

    fn from_components(values: &[&str]) -> Result<Self> {
        let Some((&name, params)) = values.split_first() else {
            return Err(CompressError::invalid_spec("empty specification"));
        };
        match name {
            "none" => no_params(name, params).map(|_| CompressionSpec::None),
            "lz4" => no_params(name, params).map(|_| CompressionSpec::Lz4),
            "zlib" => Ok(CompressionSpec::Zlib {
                level: level(name, params, ZLIB_LEVELS, DEFAULT_LEVEL_ZLIB)?,
            }),
            "lzma" => Ok(CompressionSpec::Lzma {
                level: level(name, params, LZMA_LEVELS, DEFAULT_LEVEL_LZMA)?,
            }),
            "zstd" => Ok(CompressionSpec::Zstd {
                level: level(name, params, ZSTD_LEVELS, DEFAULT_LEVEL_ZSTD)?,
            }),
            "auto" => {
                if !(1..=2).contains(&params.len()) {
                    return Err(CompressError::invalid_spec(
                        "auto takes a nested specification: auto,name[,level]",
                    ));
                }
                if params[0] == "auto" {
                    return Err(CompressError::invalid_spec("auto cannot target auto"));
                }
                Ok(CompressionSpec::Auto(Box::new(Self::from_components(params)?)))
            }
            other => Err(CompressError::invalid_spec(format!("unknown codec '{other}'"))),
        }
    }
}

fn no_params(name: &str, params: &[&str]) -> Result<()> {
    if params.is_empty() {
        Ok(())
    } else {
        Err(CompressError::invalid_spec(format!("{name} takes no parameters")))
    }
}

fn level<T>(name: &str, params: &[&str], range: RangeInclusive<T>, default: T) -> Result<T>
where
    T: FromStr + PartialOrd + fmt::Display,
{
    match params {
        [] => Ok(default),
        [raw] => {
            let not_an_integer =
                || CompressError::invalid_spec(format!("{name} level '{raw}' is not an integer"));
            // Plain decimal digits only; `str::parse` alone would take a sign.
            if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(not_an_integer());
            }
            let level: T = raw.parse().map_err(|_| not_an_integer())?;
            if range.contains(&level) {
                Ok(level)
            } else {
                Err(CompressError::invalid_spec(format!(
                    "{name} level {level} outside {}..={}",
                    range.start(),
                    range.end()
                )))
            }
        }
        _ => Err(CompressError::invalid_spec(format!(
            "{name} takes at most one parameter"
        ))),
    }
}

impl FromStr for CompressionSpec {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<&str> = s.split(',').collect();
        Self::from_components(&values)
    }
}

impl TryFrom<String> for CompressionSpec {
    type Error = CompressError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CompressionSpec> for String {
    fn from(spec: CompressionSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for CompressionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionSpec::Auto(inner) => write!(f, "auto,{inner}"),
            other => match other.level() {
                Some(level) => write!(f, "{},{}", other.name(), level),
                None => f.write_str(other.name()),
            },
        }
    }
}

impl Default for CompressionSpec {
    fn default() -> Self {
        CompressionSpec::Lz4
    }
}
