use std::fmt;
use std::str::FromStr;

use backend::Complex;

use crate::error::{Error, Result};

/// Element type of a slot vector. Tags are the strings accepted by
/// [`ElementKind::from_tag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    ComplexDouble,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Int32,
        ElementKind::UInt32,
        ElementKind::Int64,
        ElementKind::UInt64,
        ElementKind::Double,
        ElementKind::ComplexDouble,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Int32 => "int32",
            ElementKind::UInt32 => "uint32",
            ElementKind::Int64 => "int64",
            ElementKind::UInt64 => "uint64",
            ElementKind::Double => "double",
            ElementKind::ComplexDouble => "complexDouble",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        ElementKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ElementKind::from_tag(s)
            .ok_or_else(|| Error::Config(format!("unknown element tag {:?}", s)))
    }
}

/// Typed slot values, the input of encode and the output of decode.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotVector {
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Double(Vec<f64>),
    ComplexDouble(Vec<Complex>),
}

impl SlotVector {
    pub fn kind(&self) -> ElementKind {
        match self {
            SlotVector::Int32(_) => ElementKind::Int32,
            SlotVector::UInt32(_) => ElementKind::UInt32,
            SlotVector::Int64(_) => ElementKind::Int64,
            SlotVector::UInt64(_) => ElementKind::UInt64,
            SlotVector::Double(_) => ElementKind::Double,
            SlotVector::ComplexDouble(_) => ElementKind::ComplexDouble,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SlotVector::Int32(v) => v.len(),
            SlotVector::UInt32(v) => v.len(),
            SlotVector::Int64(v) => v.len(),
            SlotVector::UInt64(v) => v.len(),
            SlotVector::Double(v) => v.len(),
            SlotVector::ComplexDouble(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Coercions follow `as` casts; complex values contribute their real part.

    pub(crate) fn to_i64s(&self) -> Vec<i64> {
        match self {
            SlotVector::Int32(v) => v.iter().map(|x| *x as i64).collect(),
            SlotVector::UInt32(v) => v.iter().map(|x| *x as i64).collect(),
            SlotVector::Int64(v) => v.clone(),
            SlotVector::UInt64(v) => v.iter().map(|x| *x as i64).collect(),
            SlotVector::Double(v) => v.iter().map(|x| *x as i64).collect(),
            SlotVector::ComplexDouble(v) => v.iter().map(|z| z.re as i64).collect(),
        }
    }

    pub(crate) fn to_u64s(&self) -> Vec<u64> {
        match self {
            SlotVector::Int32(v) => v.iter().map(|x| *x as u64).collect(),
            SlotVector::UInt32(v) => v.iter().map(|x| *x as u64).collect(),
            SlotVector::Int64(v) => v.iter().map(|x| *x as u64).collect(),
            SlotVector::UInt64(v) => v.clone(),
            SlotVector::Double(v) => v.iter().map(|x| *x as u64).collect(),
            SlotVector::ComplexDouble(v) => v.iter().map(|z| z.re as u64).collect(),
        }
    }

    pub(crate) fn to_f64s(&self) -> Vec<f64> {
        match self {
            SlotVector::Int32(v) => v.iter().map(|x| *x as f64).collect(),
            SlotVector::UInt32(v) => v.iter().map(|x| *x as f64).collect(),
            SlotVector::Int64(v) => v.iter().map(|x| *x as f64).collect(),
            SlotVector::UInt64(v) => v.iter().map(|x| *x as f64).collect(),
            SlotVector::Double(v) => v.clone(),
            SlotVector::ComplexDouble(v) => v.iter().map(|z| z.re).collect(),
        }
    }

    pub(crate) fn to_complex(&self) -> Vec<Complex> {
        match self {
            SlotVector::ComplexDouble(v) => v.clone(),
            other => other.to_f64s().into_iter().map(Complex::from).collect(),
        }
    }
}

macro_rules! slot_vector_from {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<Vec<$t>> for SlotVector {
                fn from(v: Vec<$t>) -> Self {
                    SlotVector::$variant(v)
                }
            }
        )*
    };
}

slot_vector_from!(
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f64 => Double,
    Complex => ComplexDouble
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        ElementKind::ALL.iter().for_each(|kind| {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(*kind));
            assert_eq!(kind.to_string().parse::<ElementKind>().unwrap(), *kind);
        });
        assert_eq!(ElementKind::from_tag("complexdouble"), None);
        assert_eq!(ElementKind::from_tag(""), None);
    }

    #[test]
    fn coercions() {
        let v: SlotVector = SlotVector::from(vec![-1i32, 2, 3]);
        assert_eq!(v.kind(), ElementKind::Int32);
        assert_eq!(v.to_i64s(), vec![-1, 2, 3]);
        assert_eq!(v.to_f64s(), vec![-1.0, 2.0, 3.0]);

        let z: SlotVector = SlotVector::from(vec![Complex::new(2.5, 1.0)]);
        assert_eq!(z.to_f64s(), vec![2.5]);
        assert_eq!(z.to_i64s(), vec![2]);
        assert!(SlotVector::Double(Vec::new()).is_empty());
    }
}
