//! Command header dispatch and per-command field extraction.

use log::{debug, warn};

use crate::frame::Frame;
use crate::location;
use crate::mappings;
use crate::message::{FieldMap, OutputMessage, Value};

/// Recognised AT command headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTag {
    /// `+CTSDSR` — received short data service message.
    Ctsdsr,
    /// `+GMM` — model identification.
    Gmm,
    /// `+GMI` — manufacturer identification.
    Gmi,
    /// `+GMR` — revision identification.
    Gmr,
    /// `+CMEE` — extended error report.
    Cmee,
    /// `+CME ERROR` — extended error report code.
    CmeError,
    /// `+ENCR` — encryption status; recognised but not decoded.
    Encr,
    /// Any other header; kept visible as unmapped traffic.
    Unknown,
}

impl CommandTag {
    pub fn from_token(token: &str) -> Self {
        match token {
            "+CTSDSR" => Self::Ctsdsr,
            "+GMM" => Self::Gmm,
            "+GMI" => Self::Gmi,
            "+GMR" => Self::Gmr,
            "+CMEE" => Self::Cmee,
            "+CME ERROR" => Self::CmeError,
            "+ENCR" => Self::Encr,
            _ => Self::Unknown,
        }
    }

    /// Human-readable description of the command.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ctsdsr => "CT Short Data Service",
            Self::Gmm => "Model Identification",
            Self::Gmi => "Manufacturer Identification",
            Self::Gmr => "Revision Identification",
            Self::Cmee | Self::CmeError => "Error Report",
            Self::Encr => "Encryption Status",
            Self::Unknown => "unknown",
        }
    }
}

/// Decode one validated frame into an output message.
///
/// Fields start from an empty map per frame, so nothing leaks between
/// frames. A frame that is missing positional fields is logged and the
/// partially populated message is still emitted.
pub fn decode_frame(frame: &Frame) -> OutputMessage {
    let parts = frame.fields();
    let tag = CommandTag::from_token(frame.tag());

    let mut fields = FieldMap::new();
    insert(&mut fields, "sds_command", frame.tag());
    insert(&mut fields, "sds_command_desc", tag.description());

    let mut key = frame.tag().to_string();

    match tag {
        CommandTag::Ctsdsr => key = decode_ctsdsr(frame, &parts, &mut fields),
        CommandTag::Gmm => decode_gmm(frame, &parts, &mut fields),
        CommandTag::Gmi => decode_gmi(frame, &parts, &mut fields),
        CommandTag::Gmr => decode_gmr(frame, &parts, &mut fields),
        CommandTag::Cmee | CommandTag::CmeError => decode_cme(frame, &parts, &mut fields),
        CommandTag::Encr | CommandTag::Unknown => {
            insert(&mut fields, "unknown_command_message", frame.raw());
            warn!(
                "no field extraction implemented for command {}: {}",
                frame.tag(),
                frame.raw()
            );
        }
    }

    OutputMessage::new(key, fields)
}

/// Decode a frame that failed payload-length validation.
///
/// The frame stays visible: the header description is kept where recognised,
/// the raw frame text is attached and the message is marked invalid so the
/// operator is informed instead of the frame being silently dropped.
pub fn decode_invalid_frame(frame: &Frame) -> OutputMessage {
    let tag = CommandTag::from_token(frame.tag());
    let mut fields = FieldMap::new();
    insert(&mut fields, "sds_command", "unknown");
    let desc = if tag == CommandTag::Ctsdsr {
        tag.description()
    } else {
        "unknown"
    };
    insert(&mut fields, "sds_command_desc", desc);
    insert(&mut fields, "validity", "invalid");
    insert(&mut fields, "invalid_message", frame.raw());
    OutputMessage::new(format!("invalid_{}", frame.tag()), fields)
}

fn decode_ctsdsr(frame: &Frame, parts: &[&str], fields: &mut FieldMap) -> String {
    let key = frame.tag().to_string();
    const POSITIONAL: [&str; 6] = [
        "ai_service",
        "issi_sen",
        "issi_sen_type",
        "issi_rec",
        "issi_rec_type",
        "sds_length_bits",
    ];
    // Populate every positional field that is present; a short frame still
    // emits what it carries.
    for (name, value) in POSITIONAL.iter().zip(parts.iter().skip(1)) {
        insert(fields, name, value);
    }
    if parts.len() < 8 {
        warn!("unexpected CTSDSR format, emitting partial fields: {}", frame.raw());
        return key;
    }

    // The high byte of the payload carries the SDS type.
    let payload = parts[7];
    let Some(sds_type) = payload
        .get(0..2)
        .and_then(|prefix| u8::from_str_radix(prefix, 16).ok())
    else {
        warn!("unreadable SDS type prefix in payload: {payload}");
        return key;
    };
    fields.insert("sds_type".into(), Value::Int(sds_type as i64));
    insert(fields, "sds_type_desc", mappings::sds_type_description(sds_type));

    let content = payload.get(2..).unwrap_or("");
    match sds_type {
        10 => {
            debug!("decoding short location report: {payload}");
            location::decode_short_location(content, fields);
        }
        128 => match content.get(0..2).and_then(|b| i64::from_str_radix(b, 16).ok()) {
            Some(status) => {
                fields.insert("tetra_status".into(), Value::Int(status - 2));
            }
            None => warn!("unreadable status byte in payload: {payload}"),
        },
        130 => debug!("long location report handling not yet implemented"),
        131 => debug!("position request reply handling not yet implemented"),
        137 => debug!("text message handling not yet implemented"),
        138 => debug!("segmented message handling not yet implemented"),
        other => warn!(
            "unknown SDS type {other} for {}, leaving generic fields only",
            frame.tag()
        ),
    }

    format!("{}_{}_{}", frame.tag(), sds_type, parts[2])
}

fn decode_gmm(frame: &Frame, parts: &[&str], fields: &mut FieldMap) {
    if let Some(code) = parts.get(1) {
        insert(fields, "device_status", mappings::device_status(code));
    }
    if let Some(id) = parts.get(2) {
        insert(fields, "device_id", id);
    }
    if let Some(version) = parts.get(3) {
        insert(fields, "sw_version", version);
    }
    if parts.len() < 4 {
        warn!("unexpected GMM format, emitting partial fields: {}", frame.raw());
    }
    debug!("received model identification");
}

fn decode_gmi(frame: &Frame, parts: &[&str], fields: &mut FieldMap) {
    if parts.len() < 2 {
        warn!("unexpected GMI format: {}", frame.raw());
        return;
    }
    insert(fields, "manufacturer", parts[1]);
    debug!("received manufacturer identification");
}

fn decode_gmr(frame: &Frame, parts: &[&str], fields: &mut FieldMap) {
    if parts.len() < 2 {
        warn!("unexpected GMR format: {}", frame.raw());
        return;
    }
    insert(fields, "revision", parts[1]);
    debug!("received revision identification");
}

fn decode_cme(frame: &Frame, parts: &[&str], fields: &mut FieldMap) {
    if parts.len() < 2 {
        warn!("unexpected CME error format: {}", frame.raw());
        return;
    }
    insert(fields, "cme_error_code", parts[1]);
    insert(fields, "cme_error_message", mappings::cme_error(parts[1]));
    debug!("received error report: {}", frame.tag());
}

fn insert(fields: &mut FieldMap, name: &str, value: &str) {
    fields.insert(name.to_string(), Value::from(value));
}
