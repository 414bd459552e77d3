//! Grouping of normalised lines into protocol frames, plus payload-length
//! validation for short data service frames.

use log::{debug, warn};

/// One logical protocol message: a `+`-prefixed header token followed by
/// comma-joined positional fields, possibly merged from several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    raw: String,
}

impl Frame {
    pub fn new(raw: String) -> Self {
        Self { raw }
    }

    /// The full comma-joined frame text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The command header token (first comma-separated field).
    pub fn tag(&self) -> &str {
        self.raw.split(',').next().unwrap_or("")
    }

    /// All comma-separated fields, header included.
    pub fn fields(&self) -> Vec<&str> {
        self.raw.split(',').collect()
    }
}

/// Result of scanning a line sequence for frames.
#[derive(Debug, Default)]
pub struct Framed {
    /// Frames with a recognised header, in header order.
    pub complete: Vec<Frame>,
    /// Orphan lines seen before any header; carried into the next read.
    pub incomplete: Vec<String>,
}

/// Group lines into frames.
///
/// A line starting with `+` opens a frame; every immediately following line
/// without a `+` prefix is continuation data and is merged into it with a
/// comma. The wire protocol has no terminator between header and
/// continuation, so the `+` prefix convention is the only boundary. Lines
/// with no preceding header are orphan data and stay incomplete.
pub fn organize(lines: &[String]) -> Framed {
    let mut framed = Framed::default();
    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        if line.starts_with('+') {
            let mut combined = line.clone();
            let mut j = i + 1;
            while j < lines.len() && !lines[j].starts_with('+') {
                combined.push(',');
                combined.push_str(&lines[j]);
                j += 1;
            }
            debug!("framed message: {combined}");
            framed.complete.push(Frame::new(combined));
            i = j;
        } else {
            debug!("line without message header, keeping for next read: {line}");
            framed.incomplete.push(line.clone());
            i += 1;
        }
    }
    framed
}

/// Split frames into validated and invalid sets.
///
/// Only `+CTSDSR` frames declare a payload length; for those the hex payload
/// must match the declared bit count and be byte aligned, otherwise the bit
/// decoder would run over truncated data and produce silently wrong
/// coordinates. Failing frames stay visible as invalid, they are never
/// dropped.
pub fn validate(frames: Vec<Frame>) -> (Vec<Frame>, Vec<Frame>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for frame in frames {
        if frame.tag() == "+CTSDSR" && !sds_length_ok(&frame) {
            invalid.push(frame);
        } else {
            valid.push(frame);
        }
    }
    (valid, invalid)
}

fn sds_length_ok(frame: &Frame) -> bool {
    let fields = frame.fields();
    let (Some(declared), Some(payload)) = (fields.get(6), fields.get(7)) else {
        warn!("missing length fields in frame: {}", frame.raw());
        return false;
    };
    let Ok(expected_bits) = declared.parse::<usize>() else {
        warn!(
            "non-numeric declared bit length {declared:?} in frame: {}",
            frame.raw()
        );
        return false;
    };
    let bits = payload.len() * 4;
    if bits != expected_bits {
        warn!("SDS content is {bits} bits, declared {expected_bits}; treating frame as invalid");
        return false;
    }
    if bits % 8 != 0 {
        warn!("SDS content bit length {bits} is not byte aligned; treating frame as invalid");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_line_frame() {
        let framed = organize(&lines(&["+GMI,Motorola"]));
        assert_eq!(framed.complete.len(), 1);
        assert_eq!(framed.complete[0].raw(), "+GMI,Motorola");
        assert!(framed.incomplete.is_empty());
    }

    #[test]
    fn test_continuation_lines_merge_greedily() {
        let framed = organize(&lines(&["+CTSDSR,12,1,0,2,0,16", "8003", "tail"]));
        assert_eq!(framed.complete.len(), 1);
        assert_eq!(framed.complete[0].raw(), "+CTSDSR,12,1,0,2,0,16,8003,tail");
    }

    #[test]
    fn test_orphan_before_any_header() {
        let framed = organize(&lines(&["4DD400", "+GMR,1.2"]));
        assert_eq!(framed.incomplete, vec!["4DD400".to_string()]);
        assert_eq!(framed.complete.len(), 1);
        assert_eq!(framed.complete[0].raw(), "+GMR,1.2");
    }

    #[test]
    fn test_frame_order_preserved() {
        let framed = organize(&lines(&["+GMI,Motorola", "+GMR,1.2", "+GMM,54009,MTM5400,R10"]));
        let tags: Vec<&str> = framed.complete.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec!["+GMI", "+GMR", "+GMM"]);
    }

    #[test]
    fn test_header_with_no_continuation() {
        let framed = organize(&lines(&["+CTSDSR"]));
        assert_eq!(framed.complete.len(), 1);
        assert_eq!(framed.complete[0].fields(), vec!["+CTSDSR"]);
    }

    #[test]
    fn test_validate_accepts_consistent_length() {
        let frame = Frame::new("+CTSDSR,12,1,0,2,0,16,8003".into());
        let (valid, invalid) = validate(vec![frame]);
        assert_eq!(valid.len(), 1);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        // 3 hex chars = 12 bits, declared 16.
        let frame = Frame::new("+CTSDSR,12,1,0,2,0,16,800".into());
        let (valid, invalid) = validate(vec![frame]);
        assert!(valid.is_empty());
        assert_eq!(invalid.len(), 1);
    }

    #[test]
    fn test_validate_rejects_unaligned_length() {
        // 5 hex chars = 20 bits, declared 20, but 20 % 8 != 0.
        let frame = Frame::new("+CTSDSR,12,1,0,2,0,20,80031".into());
        let (valid, invalid) = validate(vec![frame]);
        assert!(valid.is_empty());
        assert_eq!(invalid.len(), 1);
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let frame = Frame::new("+CTSDSR,12,1".into());
        let (valid, invalid) = validate(vec![frame]);
        assert!(valid.is_empty());
        assert_eq!(invalid.len(), 1);
    }

    #[test]
    fn test_validate_rejects_non_numeric_length() {
        let frame = Frame::new("+CTSDSR,12,1,0,2,0,abc,8003".into());
        let (_, invalid) = validate(vec![frame]);
        assert_eq!(invalid.len(), 1);
    }

    #[test]
    fn test_validate_ignores_other_tags() {
        let frame = Frame::new("+GMI,Motorola".into());
        let (valid, invalid) = validate(vec![frame]);
        assert_eq!(valid.len(), 1);
        assert!(invalid.is_empty());
    }
}
