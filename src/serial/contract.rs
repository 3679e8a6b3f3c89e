// The codec contract: a type is persistable when it can report its encoded
// byte length, produce a buffer, and rebuild itself from one. Fixed-width
// numerics and strings satisfy the contract through the built-in impls
// below; container codecs (graph, table) satisfy it by composing them.

use crate::error::{FerryError, Result};
use crate::serial::buffer::SerializedBuffer;
use crate::serial::cursor::ByteReader;

/// Encode half of the codec contract.
///
/// `serialized_size` must match the length of the buffer `serialize`
/// produces exactly, and must not mutate the value.
pub trait Serializable {
    fn serialized_size(&self) -> usize;

    fn serialize(&self) -> Result<SerializedBuffer<'static>>;
}

/// Decode half of the codec contract.
///
/// `deserialize` never reads past the buffer's declared length; the result
/// owns independent storage and outlives the input buffer.
pub trait Deserializable: Sized {
    fn deserialize(buffer: &SerializedBuffer<'_>) -> Result<Self>;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {$(
        impl Serializable for $ty {
            fn serialized_size(&self) -> usize {
                std::mem::size_of::<$ty>()
            }

            fn serialize(&self) -> Result<SerializedBuffer<'static>> {
                Ok(SerializedBuffer::from_vec(self.to_le_bytes().to_vec()))
            }
        }

        impl Deserializable for $ty {
            fn deserialize(buffer: &SerializedBuffer<'_>) -> Result<Self> {
                let bytes = buffer.as_slice();
                if bytes.is_empty() {
                    return Err(FerryError::NoDeserializableData);
                }
                const WIDTH: usize = std::mem::size_of::<$ty>();
                match bytes.get(..WIDTH) {
                    Some(head) => {
                        let mut raw = [0u8; WIDTH];
                        raw.copy_from_slice(head);
                        Ok(<$ty>::from_le_bytes(raw))
                    }
                    None => Err(FerryError::corrupted(format!(
                        "{}-byte field in {}-byte buffer",
                        WIDTH,
                        bytes.len()
                    ))),
                }
            }
        }
    )*};
}

impl_fixed_width!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Serializable for bool {
    fn serialized_size(&self) -> usize {
        1
    }

    fn serialize(&self) -> Result<SerializedBuffer<'static>> {
        Ok(SerializedBuffer::from_vec(vec![u8::from(*self)]))
    }
}

impl Deserializable for bool {
    fn deserialize(buffer: &SerializedBuffer<'_>) -> Result<Self> {
        let bytes = buffer.as_slice();
        match bytes.first() {
            Some(&byte) => Ok(byte != 0),
            None => Err(FerryError::NoDeserializableData),
        }
    }
}

// Strings encode as an 8-byte length followed by that many UTF-8 bytes.
impl Serializable for String {
    fn serialized_size(&self) -> usize {
        8 + self.len()
    }

    fn serialize(&self) -> Result<SerializedBuffer<'static>> {
        let mut block = Vec::with_capacity(8 + self.len());
        block.extend_from_slice(&(self.len() as u64).to_le_bytes());
        block.extend_from_slice(self.as_bytes());
        Ok(SerializedBuffer::from_vec(block))
    }
}

impl Deserializable for String {
    fn deserialize(buffer: &SerializedBuffer<'_>) -> Result<Self> {
        let bytes = buffer.as_slice();
        if bytes.is_empty() {
            return Err(FerryError::NoDeserializableData);
        }
        let mut reader = ByteReader::new(bytes);
        let len = reader.get_u64()? as usize;
        let content = reader.get_bytes(len)?;
        String::from_utf8(content.to_vec())
            .map_err(|_| FerryError::corrupted("string field is not valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T>(value: T) -> T
    where
        T: Serializable + Deserializable,
    {
        let buffer = value.serialize().unwrap();
        assert_eq!(buffer.len(), value.serialized_size());
        T::deserialize(&buffer).unwrap()
    }

    #[test]
    fn test_numeric_round_trips() {
        assert_eq!(round_trip(0u8), 0);
        assert_eq!(round_trip(0xBEEFu16), 0xBEEF);
        assert_eq!(round_trip(-40_000i32), -40_000);
        assert_eq!(round_trip(u64::MAX), u64::MAX);
        assert_eq!(round_trip(-1i64), -1);
        assert_eq!(round_trip(2.5f32), 2.5);
        assert_eq!(round_trip(60000.125f64), 60000.125);
        assert!(round_trip(true));
    }

    #[test]
    fn test_numeric_little_endian_layout() {
        let buffer = 0x0102_0304u32.serialize().unwrap();
        assert_eq!(buffer.as_slice(), &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_string_round_trip() {
        let s = "FerryDB".to_string();
        assert_eq!(s.serialized_size(), 8 + 7);
        assert_eq!(round_trip(s.clone()), s);
        assert_eq!(round_trip(String::new()), "");
    }

    #[test]
    fn test_empty_buffer_has_nothing_to_decode() {
        let empty = SerializedBuffer::new(0);
        assert!(matches!(
            u64::deserialize(&empty),
            Err(FerryError::NoDeserializableData)
        ));
        assert!(matches!(
            String::deserialize(&empty),
            Err(FerryError::NoDeserializableData)
        ));
    }

    #[test]
    fn test_short_buffer_is_corruption() {
        let buffer = SerializedBuffer::from_vec(vec![1, 2, 3]);
        assert!(matches!(
            u64::deserialize(&buffer),
            Err(FerryError::DeserializableDataCorrupted(_))
        ));
    }

    #[test]
    fn test_string_length_prefix_overrun() {
        // Claims 100 bytes of content but carries 2.
        let mut block = (100u64).to_le_bytes().to_vec();
        block.extend_from_slice(b"ab");
        let buffer = SerializedBuffer::from_vec(block);
        assert!(matches!(
            String::deserialize(&buffer),
            Err(FerryError::DeserializableDataCorrupted(_))
        ));
    }
}
