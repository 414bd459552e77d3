//! Bit-level decoding of the SDS short location report (type 10).

use log::error;

use crate::mappings;
use crate::message::{FieldMap, Value};

/// Degrees per unit of the 25-bit longitude field.
const LON_SCALE: f64 = 360.0 / (1u64 << 25) as f64;
/// Degrees per unit of the 24-bit latitude field.
const LAT_SCALE: f64 = 180.0 / (1u64 << 24) as f64;

/// Packed-bit view of a hex payload; four bits per hex character.
struct Bits {
    bits: Vec<u8>,
}

impl Bits {
    /// Expand a hex payload into individual bits. `None` on non-hex input.
    fn from_hex(hex: &str) -> Option<Self> {
        let mut bits = Vec::with_capacity(hex.len() * 4);
        for ch in hex.chars() {
            let nibble = ch.to_digit(16)? as u8;
            for shift in (0..4).rev() {
                bits.push((nibble >> shift) & 1);
            }
        }
        Some(Self { bits })
    }

    fn empty() -> Self {
        Self { bits: Vec::new() }
    }

    /// Read `len` bits starting at `start` as an unsigned integer.
    /// `None` if the payload is too short.
    fn uint(&self, start: usize, len: usize) -> Option<u64> {
        let slice = self.bits.get(start..start + len)?;
        Some(slice.iter().fold(0u64, |acc, bit| (acc << 1) | *bit as u64))
    }
}

/// Decode the packed 84-bit short location report into `fields`.
///
/// `payload_hex` is the SDS content with the 2-character type prefix already
/// stripped. Field widths, the two's-complement coordinate encoding and the
/// velocity quantisation are fixed by the wire protocol. A field that cannot
/// be read gets an explicit unknown sentinel (or stays absent) and decoding
/// carries on; a partially decoded location beats none at all.
pub fn decode_short_location(payload_hex: &str, fields: &mut FieldMap) {
    let bits = match Bits::from_hex(payload_hex) {
        Some(bits) => bits,
        None => {
            error!("short location payload is not valid hex: {payload_hex}");
            Bits::empty()
        }
    };

    if let Some(pdu_type) = bits.uint(0, 2) {
        fields.insert("pdu_type".into(), Value::Int(pdu_type as i64));
    }
    if let Some(code) = bits.uint(2, 2) {
        fields.insert(
            "time_elapsed".into(),
            Value::from(mappings::time_elapsed(code as u8)),
        );
    }

    // 25-bit and 24-bit two's complement, scaled to degrees.
    if let Some(raw) = bits.uint(4, 25) {
        let mut lng = raw as i64;
        if lng >= 1 << 24 {
            lng -= 1 << 25;
        }
        fields.insert("lng".into(), Value::Float(lng as f64 * LON_SCALE));
    }
    if let Some(raw) = bits.uint(29, 24) {
        let mut lat = raw as i64;
        if lat >= 1 << 23 {
            lat -= 1 << 24;
        }
        fields.insert("lat".into(), Value::Float(lat as f64 * LAT_SCALE));
    }

    let position_error = match bits.uint(53, 3) {
        Some(code) => mappings::position_error(code as u8),
        None => "unknown",
    };
    fields.insert("position_error".into(), Value::from(position_error));

    fields.insert("velocity".into(), velocity(bits.uint(56, 7)));

    let direction = match bits.uint(63, 4) {
        Some(code) => mappings::direction(code as u8),
        None => "unknown",
    };
    fields.insert("direction".into(), Value::from(direction));

    if let Some(kind) = bits.uint(67, 1) {
        fields.insert(
            "type_additional_data_desc".into(),
            Value::from(mappings::additional_data_kind(kind as u8)),
        );
    }

    let reason = match bits.uint(68, 8) {
        Some(code) => mappings::reason_for_sending(code as u8),
        None => "unknown",
    };
    fields.insert("reason_sending_desc".into(), Value::from(reason));

    if let Some(data) = bits.uint(76, 8) {
        fields.insert("user_defined_data".into(), Value::Int(data as i64));
    }
}

/// Map the 7-bit horizontal velocity field to km/h.
///
/// Values below 28 are literal km/h; 28..=126 follow the protocol's
/// exponential step `16 * 1.038^(raw - 13)`; 127 means unknown.
fn velocity(raw: Option<u64>) -> Value {
    match raw {
        Some(raw) if raw < 28 => Value::Int(raw as i64),
        Some(raw) if raw < 127 => {
            Value::Int((16.0 * 1.038_f64.powi(raw as i32 - 13)).round() as i64)
        }
        _ => Value::from("unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 96-bit report: pdu 1, elapsed <5s, lng 11.57, lat 48.13, error <20m,
    // velocity raw 30, direction E, reason code 2, user data 0.
    const MUNICH_REPORT: &str = "4083A412239CC93C802000";
    // 96-bit report: lng -73.98, lat 40.75, error <2m, velocity raw 127,
    // direction NNW, user-defined data 66, reason code 129.
    const NEW_YORK_REPORT: &str = "4CB645A1CFA4F8FFF81420";

    fn decode(hex: &str) -> FieldMap {
        let mut fields = FieldMap::new();
        decode_short_location(hex, &mut fields);
        fields
    }

    #[test]
    fn test_decode_positive_coordinates() {
        let fields = decode(MUNICH_REPORT);
        assert_eq!(fields.get("pdu_type"), Some(&Value::Int(1)));
        assert_eq!(fields.get("time_elapsed"), Some(&Value::from("<5s")));
        let lng = fields.get("lng").and_then(Value::as_float).unwrap();
        let lat = fields.get("lat").and_then(Value::as_float).unwrap();
        assert!((lng - 11.569998264312744).abs() < 1e-12);
        assert!((lat - 48.129998445510864).abs() < 1e-12);
        assert_eq!(fields.get("position_error"), Some(&Value::from("<20m")));
        assert_eq!(fields.get("velocity"), Some(&Value::Int(30)));
        assert_eq!(fields.get("direction"), Some(&Value::from("E")));
        assert_eq!(
            fields.get("type_additional_data_desc"),
            Some(&Value::from("Reason for sending"))
        );
        assert_eq!(
            fields.get("reason_sending_desc"),
            Some(&Value::from("Emergency condition is detected"))
        );
        assert_eq!(fields.get("user_defined_data"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_decode_negative_longitude() {
        let fields = decode(NEW_YORK_REPORT);
        let lng = fields.get("lng").and_then(Value::as_float).unwrap();
        let lat = fields.get("lat").and_then(Value::as_float).unwrap();
        assert!((lng + 73.98000240325928).abs() < 1e-12);
        assert!((lat - 40.74999690055847).abs() < 1e-12);
        assert_eq!(fields.get("velocity"), Some(&Value::from("unknown")));
        assert_eq!(fields.get("direction"), Some(&Value::from("NNW")));
        assert_eq!(
            fields.get("type_additional_data_desc"),
            Some(&Value::from("User defined data"))
        );
        assert_eq!(
            fields.get("reason_sending_desc"),
            Some(&Value::from(
                "Maximum reporting interval exceeded since the last location information report"
            ))
        );
        assert_eq!(fields.get("user_defined_data"), Some(&Value::Int(66)));
    }

    #[test]
    fn test_maximum_positive_coordinates() {
        // pdu/elapsed zero, then 25 bits of 0111...1 (max positive) for
        // longitude and 24 bits likewise for latitude.
        let mut bit_string = String::from("00" /* pdu */);
        bit_string.push_str("00");
        bit_string.push('0');
        bit_string.push_str(&"1".repeat(24));
        bit_string.push('0');
        bit_string.push_str(&"1".repeat(23));
        // pad to 88 bits so the hex payload is whole characters
        while bit_string.len() < 88 {
            bit_string.push('0');
        }
        let hex = bits_to_hex(&bit_string);

        let fields = decode(&hex);
        let lng = fields.get("lng").and_then(Value::as_float).unwrap();
        let lat = fields.get("lat").and_then(Value::as_float).unwrap();
        assert!((lng - ((1u64 << 24) - 1) as f64 * 360.0 / (1u64 << 25) as f64).abs() < 1e-12);
        assert!((lat - ((1u64 << 23) - 1) as f64 * 180.0 / (1u64 << 24) as f64).abs() < 1e-12);
        assert!(lng < 180.0 && lng > 179.9999);
        assert!(lat < 90.0 && lat > 89.9999);
    }

    fn bits_to_hex(bits: &str) -> String {
        bits.as_bytes()
            .chunks(4)
            .map(|chunk| {
                let nibble = chunk
                    .iter()
                    .fold(0u32, |acc, b| (acc << 1) | (b - b'0') as u32);
                char::from_digit(nibble, 16).unwrap().to_ascii_uppercase()
            })
            .collect()
    }

    #[test]
    fn test_velocity_thresholds() {
        assert_eq!(velocity(Some(0)), Value::Int(0));
        assert_eq!(velocity(Some(27)), Value::Int(27));
        // 16 * 1.038^15 rounds to 28: the two ranges join up.
        assert_eq!(velocity(Some(28)), Value::Int(28));
        assert_eq!(velocity(Some(126)), Value::Int(1082));
        assert_eq!(velocity(Some(127)), Value::from("unknown"));
        assert_eq!(velocity(None), Value::from("unknown"));
    }

    #[test]
    fn test_non_hex_payload_yields_sentinels() {
        let fields = decode("ZZZZ");
        assert!(fields.get("lng").is_none());
        assert!(fields.get("lat").is_none());
        assert_eq!(fields.get("velocity"), Some(&Value::from("unknown")));
        assert_eq!(fields.get("direction"), Some(&Value::from("unknown")));
        assert_eq!(fields.get("position_error"), Some(&Value::from("unknown")));
        assert_eq!(fields.get("reason_sending_desc"), Some(&Value::from("unknown")));
        assert!(fields.get("user_defined_data").is_none());
    }

    #[test]
    fn test_truncated_payload_decodes_leading_fields() {
        // 8 bits: enough for pdu type and elapsed time, but the 25-bit
        // longitude field at bits 4..29 is cut off.
        let fields = decode("40");
        assert_eq!(fields.get("pdu_type"), Some(&Value::Int(1)));
        assert_eq!(fields.get("time_elapsed"), Some(&Value::from("<5s")));
        assert!(fields.get("lng").is_none());
        assert!(fields.get("lat").is_none());
        assert_eq!(fields.get("velocity"), Some(&Value::from("unknown")));
        assert_eq!(fields.get("direction"), Some(&Value::from("unknown")));
    }

    #[test]
    fn test_payload_covering_longitude_emits_it() {
        // 32 bits fully contain the longitude field, so it decodes even
        // though everything after it is missing.
        let fields = decode("4083A412");
        let lng = fields.get("lng").and_then(Value::as_float).unwrap();
        assert!((lng - 11.569998264312744).abs() < 1e-12);
        assert!(fields.get("lat").is_none());
        assert_eq!(fields.get("velocity"), Some(&Value::from("unknown")));
    }
}
