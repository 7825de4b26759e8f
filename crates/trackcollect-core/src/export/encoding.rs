//! Numeric encoding for exported documents.
//!
//! Geometry and keypoints are treated as integer pixel coordinates: floating
//! point arrays are truncated toward zero when serialized, integer arrays are
//! written as they are. Values that have no integer representation (NaN,
//! infinities, out of `i64` range) are rejected during serialization.

use serde::ser::{Error as _, SerializeMap, SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};

use crate::{CollectError, CollectResult};

/// Truncates a float toward zero, rejecting values with no integer form.
pub fn truncate_scalar(value: f32) -> CollectResult<i64> {
    // i64::MAX is not representable as f32; 2^63 is the first value out of range.
    const LIMIT: f32 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value >= LIMIT || value < -LIMIT {
        return Err(CollectError::UnencodableValue(format!(
            "{value} has no integer representation"
        )));
    }
    Ok(value.trunc() as i64)
}

/// Truncates every element of a fixed-size row.
pub fn truncate_row<const N: usize>(row: &[f32; N]) -> CollectResult<[i64; N]> {
    let mut out = [0i64; N];
    for (slot, value) in out.iter_mut().zip(row.iter()) {
        *slot = truncate_scalar(*value)?;
    }
    Ok(out)
}

// =============================================================================
// Numeric Arrays
// =============================================================================

/// A value that can be written as a plain (possibly nested) integer sequence.
pub trait NumericArray {
    fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
}

impl NumericArray for f32 {
    fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = truncate_scalar(*self).map_err(S::Error::custom)?;
        serializer.serialize_i64(value)
    }
}

macro_rules! native_numeric {
    ($($ty:ty),*) => {
        $(
            impl NumericArray for $ty {
                fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.serialize(serializer)
                }
            }
        )*
    };
}

native_numeric!(i32, i64, u32, u64, usize);

impl<T: NumericArray> NumericArray for [T] {
    fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(&Numeric(item))?;
        }
        seq.end()
    }
}

impl<T: NumericArray, const N: usize> NumericArray for [T; N] {
    fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize_numeric(serializer)
    }
}

impl<T: NumericArray> NumericArray for Vec<T> {
    fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize_numeric(serializer)
    }
}

impl<A: NumericArray, B: NumericArray> NumericArray for (A, B) {
    fn serialize_numeric<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&Numeric(&self.0))?;
        tuple.serialize_element(&Numeric(&self.1))?;
        tuple.end()
    }
}

/// Serialize adapter that writes the wrapped value through [`NumericArray`].
pub struct Numeric<'a, T: ?Sized>(pub &'a T);

impl<T: NumericArray + ?Sized> Serialize for Numeric<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize_numeric(serializer)
    }
}

/// `serialize_with` entry point for numeric array fields.
pub fn numeric<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: NumericArray + ?Sized,
    S: Serializer,
{
    value.serialize_numeric(serializer)
}

/// `serialize_with` entry point writing an absent record as `{}`.
pub fn record_or_empty<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(record) => record.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
