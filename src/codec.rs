//! Deterministic binary encoding of a [`Summary`] (§4.5):
//!
//! ```text
//! summary := element(min)
//!          | element(max)
//!          | list<element>(unbuffered)          # u32_be length prefix
//!          | int32_be(buffer_count)
//!          | buffer_count x buffer
//! buffer  := int32_be(level)
//!          | int64_be(weight)
//!          | list<element>(elements)            # u32_be length prefix
//! ```
//!
//! `unbuffered` is written and read back in insertion order (never
//! re-sorted), so a decoded summary's next `add_input` takes the same code
//! path the original summary would have. `Parameters` are deliberately not
//! part of the wire format: the caller supplies matching parameters to
//! [`Summary::decode`].

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::buffer::Buffer;
use crate::error::Error;
use crate::params::Parameters;
use crate::summary::Summary;

/// Encodes and decodes individual elements to/from a byte stream.
///
/// The element codec is supplied by the enclosing framework; this crate
/// only fixes the container format around it. [`BigEndianCodec`] is a
/// ready-made implementation for the fixed-width numeric element types this
/// crate's tests and benches exercise.
pub trait ElementCodec<T> {
    fn encode(&self, value: &T, writer: &mut dyn Write) -> io::Result<()>;
    fn decode(&self, reader: &mut dyn Read) -> Result<T, Error>;
}

/// An [`ElementCodec`] for fixed-width numeric types, writing them
/// big-endian with no per-element length prefix (their width is fixed).
pub struct BigEndianCodec;

impl ElementCodec<u64> for BigEndianCodec {
    fn encode(&self, value: &u64, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u64::<BigEndian>(*value)
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<u64, Error> {
        Ok(reader.read_u64::<BigEndian>()?)
    }
}

impl ElementCodec<i64> for BigEndianCodec {
    fn encode(&self, value: &i64, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_i64::<BigEndian>(*value)
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<i64, Error> {
        Ok(reader.read_i64::<BigEndian>()?)
    }
}

impl ElementCodec<f64> for BigEndianCodec {
    fn encode(&self, value: &f64, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_f64::<BigEndian>(*value)
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<f64, Error> {
        Ok(reader.read_f64::<BigEndian>()?)
    }
}

fn write_list<T, C: ElementCodec<T>>(
    elements: &[T],
    codec: &C,
    writer: &mut dyn Write,
) -> io::Result<()> {
    writer.write_u32::<BigEndian>(elements.len() as u32)?;
    for element in elements {
        codec.encode(element, writer)?;
    }
    Ok(())
}

fn read_list<T, C: ElementCodec<T>>(codec: &C, reader: &mut dyn Read) -> Result<Vec<T>, Error> {
    let len = reader.read_u32::<BigEndian>()?;
    let mut elements = Vec::with_capacity(len as usize);
    for _ in 0..len {
        elements.push(codec.decode(reader)?);
    }
    Ok(elements)
}

/// Element encoding failed while writing, reported through the `io::Write`
/// error channel since `encode` only ever performs writes.
fn to_io_error(err: Error) -> io::Error {
    match err {
        Error::Io(err) => err,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

impl<T: Ord + Clone> Summary<T> {
    /// Write this summary's deterministic binary encoding. Panics if called
    /// on an empty summary (there is no `min`/`max` to write).
    pub fn encode<C: ElementCodec<T>>(&self, codec: &C, writer: &mut dyn Write) -> io::Result<()> {
        let min = self.min.as_ref().expect("cannot encode an empty summary");
        let max = self.max.as_ref().expect("cannot encode an empty summary");
        codec.encode(min, writer).map_err(to_io_error)?;
        codec.encode(max, writer).map_err(to_io_error)?;
        write_list(&self.unbuffered, codec, writer)?;

        writer.write_i32::<BigEndian>(self.buffers.len() as i32)?;
        for buffer in &self.buffers {
            writer.write_i32::<BigEndian>(buffer.level as i32)?;
            writer.write_i64::<BigEndian>(buffer.weight as i64)?;
            write_list(&buffer.elements, codec, writer)?;
        }
        Ok(())
    }

    /// Decode a summary previously written by [`Summary::encode`].
    ///
    /// `params` must match the parameters the original summary was built
    /// with: they are not recovered from the stream (§4.5, §9).
    pub fn decode<C: ElementCodec<T>>(
        params: Parameters,
        codec: &C,
        reader: &mut dyn Read,
    ) -> Result<Summary<T>, Error> {
        let min = codec.decode(reader)?;
        let max = codec.decode(reader)?;
        let unbuffered = read_list(codec, reader)?;

        let buffer_count = reader.read_i32::<BigEndian>()?;
        if buffer_count < 0 {
            tracing::warn!(buffer_count, "refusing to decode negative buffer_count");
            return Err(Error::Codec(format!(
                "negative buffer_count: {}",
                buffer_count
            )));
        }

        let mut buffers = Vec::with_capacity(buffer_count as usize);
        for _ in 0..buffer_count {
            let level = reader.read_i32::<BigEndian>()?;
            if level < 0 {
                return Err(Error::Codec(format!("negative buffer level: {}", level)));
            }
            let weight = reader.read_i64::<BigEndian>()?;
            if weight < 1 {
                return Err(Error::Codec(format!(
                    "non-positive buffer weight: {}",
                    weight
                )));
            }
            let elements = read_list(codec, reader)?;
            buffers.push(Buffer::new(level as u32, weight as u64, elements));
        }

        Ok(Summary::from_decoded(params, min, max, unbuffered, buffers))
    }
}
