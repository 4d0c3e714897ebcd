//! Parsing of Artifactory's human-readable numbers and sizes.
//!
//! The storage API reports most quantities as display strings such as
//! `"125,876"`, `"3.33 TB"`, or `"85.2%"` rather than as numbers. These
//! helpers convert them back.

use crate::Result;
use crate::error::Error;

/// Parse a display string as a plain number, discarding grouping commas, unit
/// suffixes, and any other non-numeric punctuation.
///
/// Everything that is not an ASCII digit or a decimal point is stripped
/// before parsing, so `"1,234.50"` yields `1234.50` and `"85%"` yields `85`.
/// If nothing parseable remains (including the empty string), this fails with
/// [`Error::Format`].
pub fn parse_numeric(s: &str) -> Result<f64> {
    let stripped: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    stripped.parse().map_err(|_e| Error::Format(s.to_string()))
}

/// Parse a size display string such as `"3.33 TB"` into a byte count.
///
/// The unit is detected by a case-sensitive substring match, checked in fixed
/// priority order: `bytes`, `KB`, `MB`, `GB`, `TB`, scaling by powers of
/// 1024. The match is not anchored to the end of the string; `"1 GBX"` still
/// counts as gigabytes. A string with none of the five units fails with
/// [`Error::UnknownUnit`] even when its numeric part is valid.
pub fn parse_byte_size(s: &str) -> Result<f64> {
    const KIB: f64 = 1024.0;

    let num = parse_numeric(s)?;

    if s.contains("bytes") {
        Ok(num)
    } else if s.contains("KB") {
        Ok(num * KIB)
    } else if s.contains("MB") {
        Ok(num * KIB * KIB)
    } else if s.contains("GB") {
        Ok(num * KIB * KIB * KIB)
    } else if s.contains("TB") {
        Ok(num * KIB * KIB * KIB * KIB)
    } else {
        Err(Error::UnknownUnit(s.to_string()))
    }
}
