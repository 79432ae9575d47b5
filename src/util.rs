//! Small helpers shared by the binary-format parsers.

/// Read a little-endian u16 out of `bytes` at `offset`.
///
/// Callers validate lengths before reading; slicing past the end is a bug
/// in the caller, not a recoverable condition.
pub fn read_u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

/// Decode a fixed-width, null-padded string field.
///
/// Everything up to the first NUL (or the end of the field) is the visible
/// name. Non-UTF-8 bytes are replaced rather than rejected; archive names
/// are plain ASCII in practice.
pub fn fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Split a metadata resource holding consecutive NUL-terminated strings
/// (application name, application version, project name).
pub fn inf_strings(bytes: &[u8]) -> Option<(String, String, String)> {
    let mut parts = bytes
        .split(|&b| b == 0)
        .map(|part| String::from_utf8_lossy(part).into_owned());
    let app = parts.next()?;
    let version = parts.next()?;
    let project = parts.next()?;
    Some((app, version, project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_fields_are_little_endian() {
        assert_eq!(read_u16_le(&[0x34, 0x12], 0), 0x1234);
        assert_eq!(read_u16_le(&[0xff, 0x34, 0x12], 1), 0x1234);
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        assert_eq!(fixed_str(b"main.pal\0\0\0\0\0\0"), "main.pal");
        assert_eq!(fixed_str(b"unterminated"), "unterminated");
        assert_eq!(fixed_str(b"\0\0\0"), "");
    }

    #[test]
    fn inf_strings_splits_three_fields() {
        let bytes = b"boxcart\00.3.0\0My Project\0";
        let (app, version, project) = inf_strings(bytes).unwrap();
        assert_eq!(app, "boxcart");
        assert_eq!(version, "0.3.0");
        assert_eq!(project, "My Project");
    }

    #[test]
    fn inf_strings_requires_three_fields() {
        assert!(inf_strings(b"only-one\0").is_none());
    }
}
