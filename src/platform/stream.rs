//! Backend-native bulk data buffers.
//!
//! A stream holds `size` elements of a fixed [`DataType`]; transfers go
//! through flat `f64` slices of length `size × width`. Platforms expose their
//! preferred constructor through
//! [`Platform::default_stream_factory`](super::Platform::default_stream_factory).

use std::fmt;

use super::error::Error;
use crate::context::ContextView;

/// Element type of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float,
    Float2,
    Float3,
    Float4,
    Double,
    Double2,
    Double3,
    Double4,
    Integer,
    Integer2,
    Integer3,
    Integer4,
}

impl DataType {
    /// Number of scalar components per element.
    pub const fn width(self) -> usize {
        match self {
            DataType::Float | DataType::Double | DataType::Integer => 1,
            DataType::Float2 | DataType::Double2 | DataType::Integer2 => 2,
            DataType::Float3 | DataType::Double3 | DataType::Integer3 => 3,
            DataType::Float4 | DataType::Double4 | DataType::Integer4 => 4,
        }
    }

    /// Rounds a value to what an element of this type can represent.
    fn quantize(self, value: f64) -> f64 {
        match self {
            DataType::Float | DataType::Float2 | DataType::Float3 | DataType::Float4 => {
                value as f32 as f64
            }
            DataType::Integer | DataType::Integer2 | DataType::Integer3 | DataType::Integer4 => {
                value.trunc()
            }
            _ => value,
        }
    }
}

/// Backend implementation behind a [`Stream`].
pub trait StreamImpl: Send {
    fn name(&self) -> &str;

    /// Number of elements.
    fn size(&self) -> usize;

    fn data_type(&self) -> DataType;

    /// Copies `values` (`size × width` scalars) into the stream.
    fn load_from_array(&mut self, values: &[f64]) -> Result<(), Error>;

    /// Copies the stream contents into `values` (`size × width` scalars).
    fn save_to_array(&self, values: &mut [f64]) -> Result<(), Error>;

    fn fill_with_value(&mut self, value: f64);
}

/// Creates streams in a backend's native storage.
pub trait StreamFactory: Send + Sync {
    fn create_stream_impl(
        &self,
        name: &str,
        size: usize,
        data_type: DataType,
        context: &ContextView<'_>,
    ) -> Result<Box<dyn StreamImpl>, Error>;
}

/// Owning handle to a stream implementation.
pub struct Stream {
    inner: Box<dyn StreamImpl>,
}

impl Stream {
    pub fn new(inner: Box<dyn StreamImpl>) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn data_type(&self) -> DataType {
        self.inner.data_type()
    }

    pub fn load_from_array(&mut self, values: &[f64]) -> Result<(), Error> {
        self.inner.load_from_array(values)
    }

    pub fn save_to_array(&self, values: &mut [f64]) -> Result<(), Error> {
        self.inner.save_to_array(values)
    }

    pub fn fill_with_value(&mut self, value: f64) {
        self.inner.fill_with_value(value)
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("name", &self.name())
            .field("size", &self.size())
            .field("data_type", &self.data_type())
            .finish()
    }
}

/// Stream held in ordinary host memory.
#[derive(Debug, Clone)]
pub struct HostStream {
    name: String,
    size: usize,
    data_type: DataType,
    values: Vec<f64>,
}

impl HostStream {
    pub fn new(name: impl Into<String>, size: usize, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            size,
            data_type,
            values: vec![0.0; size * data_type.width()],
        }
    }

    fn check_len(&self, len: usize) -> Result<(), Error> {
        let expected = self.values.len();
        if len == expected {
            Ok(())
        } else {
            Err(Error::stream(
                &self.name,
                format!(
                    "expected {expected} values ({} × {:?}), got {len}",
                    self.size, self.data_type
                ),
            ))
        }
    }
}

impl StreamImpl for HostStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.size
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn load_from_array(&mut self, values: &[f64]) -> Result<(), Error> {
        self.check_len(values.len())?;
        let data_type = self.data_type;
        for (dst, &src) in self.values.iter_mut().zip(values) {
            *dst = data_type.quantize(src);
        }
        Ok(())
    }

    fn save_to_array(&self, values: &mut [f64]) -> Result<(), Error> {
        self.check_len(values.len())?;
        values.copy_from_slice(&self.values);
        Ok(())
    }

    fn fill_with_value(&mut self, value: f64) {
        let value = self.data_type.quantize(value);
        self.values.fill(value);
    }
}

/// Factory for [`HostStream`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostStreamFactory;

impl StreamFactory for HostStreamFactory {
    fn create_stream_impl(
        &self,
        name: &str,
        size: usize,
        data_type: DataType,
        _context: &ContextView<'_>,
    ) -> Result<Box<dyn StreamImpl>, Error> {
        Ok(Box::new(HostStream::new(name, size, data_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(DataType::Double.width(), 1);
        assert_eq!(DataType::Float3.width(), 3);
        assert_eq!(DataType::Integer4.width(), 4);
    }

    #[test]
    fn load_then_save() {
        let mut stream = Stream::new(Box::new(HostStream::new("positions", 2, DataType::Double3)));
        let values = [0.1, 0.2, 0.3, 1.1, 1.2, 1.3];
        stream.load_from_array(&values).unwrap();

        let mut out = [0.0; 6];
        stream.save_to_array(&mut out).unwrap();
        assert_eq!(out, values);
    }

    #[test]
    fn rejects_wrong_length() {
        let mut stream = HostStream::new("charges", 3, DataType::Double);
        let err = stream.load_from_array(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Stream { ref name, .. } if name == "charges"));
        let mut out = [0.0; 4];
        assert!(stream.save_to_array(&mut out).is_err());
    }

    #[test]
    fn values_are_quantized_to_element_type() {
        let mut ints = HostStream::new("indices", 2, DataType::Integer);
        ints.load_from_array(&[1.9, -2.5]).unwrap();
        let mut out = [0.0; 2];
        ints.save_to_array(&mut out).unwrap();
        assert_eq!(out, [1.0, -2.0]);

        let mut floats = HostStream::new("x", 1, DataType::Float);
        floats.fill_with_value(0.1);
        let mut out = [0.0; 1];
        floats.save_to_array(&mut out).unwrap();
        assert_eq!(out[0], 0.1f32 as f64);
    }
}
