//! Homogeneous numeric buffers with an explicit shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of an [`NDArray`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Uint8,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Uint8 => "uint8",
            DType::Uint32 => "uint32",
            DType::Int32 => "int32",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

/// Backing storage of an [`NDArray`], row-major
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data", rename_all = "lowercase")]
pub enum NDArrayData {
    Uint8(Vec<u8>),
    Uint32(Vec<u32>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Row-major buffer whose `shape` covers every element of `data`.
///
/// Deserialization rejects shapes that disagree with the buffer length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NDArrayParts")]
pub struct NDArray {
    pub data: NDArrayData,
    pub shape: Vec<usize>,
}

#[derive(Deserialize)]
struct NDArrayParts {
    data: NDArrayData,
    shape: Vec<usize>,
}

impl TryFrom<NDArrayParts> for NDArray {
    type Error = String;

    fn try_from(parts: NDArrayParts) -> Result<Self, String> {
        let array = NDArray {
            data: parts.data,
            shape: parts.shape,
        };
        array.check_shape()?;
        Ok(array)
    }
}

impl NDArray {
    /// One-dimensional array over `data`
    pub fn vector(data: NDArrayData) -> Self {
        let len = data.len();
        Self {
            data,
            shape: vec![len],
        }
    }

    /// Two-dimensional `rows x cols` array; `None` if the sizes disagree.
    pub fn matrix(data: NDArrayData, rows: usize, cols: usize) -> Option<Self> {
        (data.len() == rows * cols).then(|| Self {
            data,
            shape: vec![rows, cols],
        })
    }

    /// Fails when the shape is empty or its product is not the buffer length
    pub fn check_shape(&self) -> Result<(), String> {
        let expected: usize = self.shape.iter().product();
        if self.shape.is_empty() || expected != self.data.len() {
            return Err(format!(
                "shape {:?} does not match {} {} values",
                self.shape,
                self.data.len(),
                self.dtype()
            ));
        }
        Ok(())
    }

    pub fn dtype(&self) -> DType {
        match self.data {
            NDArrayData::Uint8(_) => DType::Uint8,
            NDArrayData::Uint32(_) => DType::Uint32,
            NDArrayData::Int32(_) => DType::Int32,
            NDArrayData::Float32(_) => DType::Float32,
            NDArrayData::Float64(_) => DType::Float64,
        }
    }

    pub fn dimension(&self) -> usize {
        self.shape.len()
    }

    /// Number of rows (extent of the first axis)
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened values widened to `f64`
    pub fn to_f64(&self) -> Vec<f64> {
        match &self.data {
            NDArrayData::Uint8(v) => v.iter().map(|&x| x as f64).collect(),
            NDArrayData::Uint32(v) => v.iter().map(|&x| x as f64).collect(),
            NDArrayData::Int32(v) => v.iter().map(|&x| x as f64).collect(),
            NDArrayData::Float32(v) => v.iter().map(|&x| x as f64).collect(),
            NDArrayData::Float64(v) => v.clone(),
        }
    }

    /// Keep only the given rows, preserving the trailing axes
    pub fn select(&self, rows: &[usize]) -> Self {
        let stride: usize = self.shape.iter().skip(1).product();
        fn pick<T: Copy>(v: &[T], rows: &[usize], stride: usize) -> Vec<T> {
            rows.iter()
                .flat_map(|&r| v[r * stride..(r + 1) * stride].iter().copied())
                .collect()
        }
        let data = match &self.data {
            NDArrayData::Uint8(v) => NDArrayData::Uint8(pick(v, rows, stride)),
            NDArrayData::Uint32(v) => NDArrayData::Uint32(pick(v, rows, stride)),
            NDArrayData::Int32(v) => NDArrayData::Int32(pick(v, rows, stride)),
            NDArrayData::Float32(v) => NDArrayData::Float32(pick(v, rows, stride)),
            NDArrayData::Float64(v) => NDArrayData::Float64(pick(v, rows, stride)),
        };
        let mut shape = self.shape.clone();
        if let Some(first) = shape.first_mut() {
            *first = rows.len();
        }
        Self { data, shape }
    }
}

impl NDArrayData {
    pub fn len(&self) -> usize {
        match self {
            NDArrayData::Uint8(v) => v.len(),
            NDArrayData::Uint32(v) => v.len(),
            NDArrayData::Int32(v) => v.len(),
            NDArrayData::Float32(v) => v.len(),
            NDArrayData::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
