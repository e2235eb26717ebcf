//! EXIF orientation reader.
//!
//! Walks the JPEG marker segments looking for the APP1 `Exif` block, then
//! scans IFD0 of the embedded TIFF structure for the Orientation tag. This is
//! the only place the crate parses container metadata; decoding and the crop
//! session both go through [`read_orientation`].
//!
//! Layout consumed:
//!
//! ```text
//! FF D8                      SOI
//! FF Ex LL LL ...            marker segments (length includes itself)
//! FF E1 LL LL "Exif" 00 00   APP1
//!   "II" | "MM" 2A ..        TIFF header (byte order + magic)
//!   OO OO OO OO              IFD0 offset, relative to the TIFF header
//!   NN NN                    entry count
//!   TT TT ty ty cc cc cc cc vv vv ..   12-byte entries
//! ```

use thiserror::Error;
use tracing::debug;

use super::Orientation;

const JPEG_SOI: u16 = 0xFFD8;
const MARKER_APP1: u16 = 0xFFE1;
const EXIF_SIGNATURE: u32 = 0x4578_6966; // "Exif"
const BYTE_ORDER_LE: u16 = 0x4949; // "II"
const BYTE_ORDER_BE: u16 = 0x4D4D; // "MM"
const TAG_ORIENTATION: u16 = 0x0112;
const IFD_ENTRY_SIZE: usize = 12;

/// Segments whose stated length is at or below this are treated as malformed.
const MIN_SEGMENT_LENGTH: u16 = 8;

/// Reasons an orientation could not be read. None of these are fatal:
/// callers fall back to [`Orientation::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrientationError {
    /// The stream does not start with the JPEG SOI marker.
    #[error("Not a JPEG stream")]
    NotAJpeg,

    /// A read would have run past the end of the buffer.
    #[error("Malformed JPEG/EXIF container")]
    MalformedContainer,

    /// The container is a JPEG but carries no orientation tag.
    #[error("No orientation tag found")]
    NoOrientationTag,

    /// The orientation tag holds a value outside 1-8.
    #[error("Invalid orientation value: {0}")]
    InvalidValue(u16),
}

/// Read the EXIF orientation stored in a JPEG byte stream.
///
/// # Arguments
///
/// * `bytes` - Raw encoded image bytes
///
/// # Errors
///
/// - `OrientationError::NotAJpeg` - the first two bytes are not `FF D8`
/// - `OrientationError::NoOrientationTag` - no APP1/Exif block, no tag, or a
///   degenerate segment length
/// - `OrientationError::MalformedContainer` - a field points past the buffer
/// - `OrientationError::InvalidValue` - the tag value is outside 1-8
pub fn read_orientation(bytes: &[u8]) -> Result<Orientation, OrientationError> {
    let code = read_orientation_code(bytes)?;
    Orientation::from_code(code).ok_or(OrientationError::InvalidValue(code))
}

/// Read the orientation, treating every failure as "no correction needed".
pub fn orientation_or_default(bytes: &[u8]) -> Orientation {
    match read_orientation(bytes) {
        Ok(orientation) => orientation,
        Err(e) => {
            debug!(reason = %e, "orientation unavailable, using identity");
            Orientation::Normal
        }
    }
}

/// Scan the marker segments and return the raw orientation tag value.
fn read_orientation_code(bytes: &[u8]) -> Result<u16, OrientationError> {
    if bytes.len() < 2 || read_u16(bytes, 0, false)? != JPEG_SOI {
        return Err(OrientationError::NotAJpeg);
    }

    let mut offset = 2usize;
    while offset < bytes.len() {
        let length = read_u16(bytes, offset + 2, false)?;
        if length <= MIN_SEGMENT_LENGTH {
            return Err(OrientationError::NoOrientationTag);
        }

        let marker = read_u16(bytes, offset, false)?;
        if marker == MARKER_APP1 {
            return read_exif_segment(bytes, offset + 4);
        }
        if marker & 0xFF00 != 0xFF00 {
            break;
        }

        offset += 2 + length as usize;
    }

    Err(OrientationError::NoOrientationTag)
}

/// Parse an APP1 payload starting at the `Exif` signature.
fn read_exif_segment(bytes: &[u8], start: usize) -> Result<u16, OrientationError> {
    if read_u32(bytes, start, false)? != EXIF_SIGNATURE {
        return Err(OrientationError::NoOrientationTag);
    }

    // "Exif\0\0" precedes the TIFF header.
    let tiff_start = start + 6;
    let little_endian = match read_u16(bytes, tiff_start, false)? {
        BYTE_ORDER_LE => true,
        BYTE_ORDER_BE => false,
        _ => return Err(OrientationError::MalformedContainer),
    };

    let ifd_offset = read_u32(bytes, tiff_start + 4, little_endian)? as usize;
    let ifd_start = tiff_start
        .checked_add(ifd_offset)
        .ok_or(OrientationError::MalformedContainer)?;

    let entry_count = read_u16(bytes, ifd_start, little_endian)? as usize;
    let entries_start = ifd_start + 2;

    for i in 0..entry_count {
        let entry = entries_start + i * IFD_ENTRY_SIZE;
        if read_u16(bytes, entry, little_endian)? == TAG_ORIENTATION {
            return read_u16(bytes, entry + 8, little_endian);
        }
    }

    Err(OrientationError::NoOrientationTag)
}

fn read_u16(bytes: &[u8], offset: usize, little_endian: bool) -> Result<u16, OrientationError> {
    let end = offset
        .checked_add(2)
        .ok_or(OrientationError::MalformedContainer)?;
    let buf: [u8; 2] = bytes
        .get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(OrientationError::MalformedContainer)?;
    Ok(if little_endian {
        u16::from_le_bytes(buf)
    } else {
        u16::from_be_bytes(buf)
    })
}

fn read_u32(bytes: &[u8], offset: usize, little_endian: bool) -> Result<u32, OrientationError> {
    let end = offset
        .checked_add(4)
        .ok_or(OrientationError::MalformedContainer)?;
    let buf: [u8; 4] = bytes
        .get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(OrientationError::MalformedContainer)?;
    Ok(if little_endian {
        u32::from_le_bytes(buf)
    } else {
        u32::from_be_bytes(buf)
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_all_codes_little_endian() {
        for code in 1..=8u16 {
            let bytes = minimal_exif_jpeg(code, true, false);
            assert_eq!(read_orientation(&bytes).map(Orientation::code), Ok(code));
        }
    }

    #[test]
    fn test_all_codes_big_endian() {
        for code in 1..=8u16 {
            let bytes = minimal_exif_jpeg(code, false, false);
            assert_eq!(read_orientation(&bytes).map(Orientation::code), Ok(code));
        }
    }

    #[test]
    fn test_app1_after_app0() {
        let bytes = minimal_exif_jpeg(6, true, true);
        assert_eq!(read_orientation(&bytes), Ok(Orientation::Rotate90CW));
    }

    #[test]
    fn test_orientation_after_other_entries() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend(orientation_app1(3, false, 4));
        assert_eq!(read_orientation(&bytes), Ok(Orientation::Rotate180));
    }

    #[test]
    fn test_not_a_jpeg() {
        assert_eq!(
            read_orientation(&[0x89, 0x50, 0x4E, 0x47]),
            Err(OrientationError::NotAJpeg)
        );
        assert_eq!(read_orientation(&[]), Err(OrientationError::NotAJpeg));
        assert_eq!(read_orientation(&[0xFF]), Err(OrientationError::NotAJpeg));
    }

    #[test]
    fn test_jpeg_without_app1() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend(jfif_app0());
        // SOS with the minimal 8-byte length ends the walk
        bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::NoOrientationTag)
        );
    }

    #[test]
    fn test_non_exif_app1() {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10];
        bytes.extend_from_slice(b"http://ns.adobe");
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::NoOrientationTag)
        );
    }

    #[test]
    fn test_desynchronized_marker_stops_scan() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0x12, 0x34, 0x00, 0x20]);
        bytes.extend(vec![0u8; 32]);
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::NoOrientationTag)
        );
    }

    #[test]
    fn test_short_segment_length() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00];
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::NoOrientationTag)
        );
    }

    #[test]
    fn test_no_orientation_entry() {
        let mut app1 = orientation_app1(1, true, 2);
        // Rename the orientation tag so the scan exhausts every entry
        let tag_pos = app1.len() - 16;
        app1[tag_pos] = 0x13;
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend(app1);
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::NoOrientationTag)
        );
    }

    #[test]
    fn test_truncated_segment_header() {
        // SOI followed by half a marker
        assert_eq!(
            read_orientation(&[0xFF, 0xD8, 0xFF]),
            Err(OrientationError::MalformedContainer)
        );
    }

    #[test]
    fn test_truncated_ifd() {
        let bytes = minimal_exif_jpeg(6, true, false);
        // Cut inside the orientation entry
        let cut = &bytes[..bytes.len() - 10];
        assert_eq!(
            read_orientation(cut),
            Err(OrientationError::MalformedContainer)
        );
    }

    #[test]
    fn test_ifd_offset_past_end() {
        let mut bytes = minimal_exif_jpeg(6, true, false);
        // IFD0 offset lives 4 bytes into the TIFF header (SOI 2 + APP1 hdr 4 + Exif 6)
        let ifd_offset_pos = 2 + 4 + 6 + 4;
        bytes[ifd_offset_pos..ifd_offset_pos + 4].copy_from_slice(&0xFFFF_FF00u32.to_le_bytes());
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::MalformedContainer)
        );
    }

    #[test]
    fn test_unknown_byte_order() {
        let mut bytes = minimal_exif_jpeg(6, true, false);
        bytes[12] = b'X';
        bytes[13] = b'X';
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::MalformedContainer)
        );
    }

    #[test]
    fn test_invalid_value() {
        let bytes = minimal_exif_jpeg(9, true, false);
        assert_eq!(
            read_orientation(&bytes),
            Err(OrientationError::InvalidValue(9))
        );
        assert_eq!(orientation_or_default(&bytes), Orientation::Normal);
    }

    #[test]
    fn test_orientation_or_default() {
        assert_eq!(orientation_or_default(&[0, 1, 2]), Orientation::Normal);
        assert_eq!(
            orientation_or_default(&minimal_exif_jpeg(8, false, true)),
            Orientation::Rotate270CW
        );
    }

    #[test]
    fn test_read_u16_endianness() {
        assert_eq!(read_u16(&[0x34, 0x12], 0, true), Ok(0x1234));
        assert_eq!(read_u16(&[0x12, 0x34], 0, false), Ok(0x1234));
        assert_eq!(
            read_u16(&[0x12], 0, false),
            Err(OrientationError::MalformedContainer)
        );
        assert_eq!(
            read_u16(&[0x12, 0x34], usize::MAX, false),
            Err(OrientationError::MalformedContainer)
        );
    }

    #[test]
    fn test_read_u32_endianness() {
        assert_eq!(read_u32(&[0x78, 0x56, 0x34, 0x12], 0, true), Ok(0x1234_5678));
        assert_eq!(read_u32(&[0x12, 0x34, 0x56, 0x78], 0, false), Ok(0x1234_5678));
    }

    #[test]
    fn test_agrees_with_kamadak_exif() {
        use std::io::Cursor;

        for little_endian in [true, false] {
            for code in 1..=8u16 {
                let bytes = minimal_exif_jpeg(code, little_endian, true);
                let exif = ::exif::Reader::new()
                    .read_from_container(&mut Cursor::new(&bytes))
                    .expect("kamadak-exif should parse the fixture");
                let field = exif
                    .get_field(::exif::Tag::Orientation, ::exif::In::PRIMARY)
                    .expect("orientation field");
                let expected = field.value.get_uint(0).expect("orientation value");

                let ours = read_orientation(&bytes).map(|o| o.code() as u32);
                assert_eq!(ours, Ok(expected), "code {code}, le {little_endian}");
            }
        }
    }
}
