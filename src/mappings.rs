//! Static lookup tables for TETRA message decoding.
//!
//! Every lookup is total: unmapped codes yield an explicit `"unknown"`
//! sentinel instead of an error.

/// Elapsed time since the position was measured (2-bit field).
pub fn time_elapsed(code: u8) -> &'static str {
    match code {
        0 => "<5s",
        1 => "<5min",
        2 => "<30min",
        3 => "unknown or not applicable",
        _ => "unknown",
    }
}

/// Horizontal position error bucket (3-bit field).
pub fn position_error(code: u8) -> &'static str {
    match code {
        0 => "<2m",
        1 => "<20m",
        2 => "<200m",
        3 => "<2km",
        4 => "<20km",
        5 => "<=200km",
        6 => ">200km",
        7 => "error or unknown",
        _ => "unknown",
    }
}

/// Travel direction compass point (4-bit field).
pub fn direction(code: u8) -> &'static str {
    match code {
        0 => "N",
        1 => "NNE",
        2 => "NE",
        3 => "ENE",
        4 => "E",
        5 => "ESE",
        6 => "SE",
        7 => "SSE",
        8 => "S",
        9 => "SSW",
        10 => "SW",
        11 => "WSW",
        12 => "W",
        13 => "WNW",
        14 => "NW",
        15 => "NNW",
        _ => "unknown",
    }
}

/// Kind of trailing data in a short location report (1-bit field).
pub fn additional_data_kind(code: u8) -> &'static str {
    match code {
        0 => "Reason for sending",
        1 => "User defined data",
        _ => "unknown",
    }
}

/// Reason the subscriber unit sent a location report (8-bit field).
pub fn reason_for_sending(code: u8) -> &'static str {
    match code {
        0 => "Subscriber unit is powered ON",
        1 => "Subscriber unit is powered OFF",
        2 => "Emergency condition is detected",
        3 => "Push-to-talk condition is detected",
        4 => "Status",
        5 => "Transmit inhibit mode ON",
        6 => "Transmit inhibit mode OFF",
        7 => "System access (TMO ON)",
        8 => "DMO ON",
        9 => "Enter service (after being out of service)",
        10 => "Service loss",
        11 => "Cell reselection or change of serving cell",
        12 => "Low battery",
        13 => "Subscriber unit is connected to a car kit",
        14 => "Subscriber unit is disconnected from a car kit",
        15 => "Subscriber unit asks for transfer initialization configuration",
        16 => "Arrival at destination",
        17 => "Arrival at a defined location",
        18 => "Approaching a defined location",
        19 => "SDS type-1 entered",
        20 => "User application initiated",
        21 => "Lost ability to determine location",
        22 => "Regained ability to determine location",
        23 => "Leaving point",
        24 => "Ambience Listening call is detected",
        25 => "Start of temporary reporting",
        26 => "Return to normal reporting",
        27 => "Call setup type 1 detected",
        28 => "Call setup type 2 detected",
        29 => "Positioning device in MS ON",
        30 => "Positioning device in MS OFF",
        32 => "Response to an immediate location request",
        129 => "Maximum reporting interval exceeded since the last location information report",
        130 => "Maximum reporting distance limit travelled since last location information report",
        _ => "unknown",
    }
}

/// Description of an SDS message type.
pub fn sds_type_description(sds_type: u8) -> &'static str {
    match sds_type {
        10 => "Short Location Report",
        128 => "Status Report",
        130 => "Long Location Report",
        131 => "Position Request Reply",
        137 => "Text Message",
        138 => "Segmented Message",
        _ => "unknown",
    }
}

/// CME error description for a `+CMEE`/`+CME ERROR` code.
pub fn cme_error(code: &str) -> &'static str {
    match code {
        "3" => "Operation not allowed",
        "4" => "Operation not supported",
        "25" => "Invalid characters in text string",
        "33" => "Parameter wrong type",
        "34" => "Parameter value out of range",
        "35" => "Syntax error",
        "44" => "Unknown parameter",
        _ => "unknown",
    }
}

/// Device status code reported in the `+GMM` model identification.
pub fn device_status(code: &str) -> &'static str {
    match code {
        "54000" => "Power on, no network",
        "54001" => "Scanning / searching for network",
        "54008" => "Registered in network",
        "54009" => "Registered in TMO, active",
        "54010" => "DMO mode",
        "54020" => "Network change / cell reselection",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_elapsed_buckets() {
        assert_eq!(time_elapsed(0), "<5s");
        assert_eq!(time_elapsed(3), "unknown or not applicable");
        assert_eq!(time_elapsed(4), "unknown");
    }

    #[test]
    fn test_position_error_extremes() {
        assert_eq!(position_error(0), "<2m");
        assert_eq!(position_error(7), "error or unknown");
    }

    #[test]
    fn test_direction_compass() {
        assert_eq!(direction(0), "N");
        assert_eq!(direction(4), "E");
        assert_eq!(direction(15), "NNW");
        assert_eq!(direction(16), "unknown");
    }

    #[test]
    fn test_reason_for_sending_sparse() {
        assert_eq!(reason_for_sending(2), "Emergency condition is detected");
        assert_eq!(reason_for_sending(32), "Response to an immediate location request");
        assert_eq!(reason_for_sending(31), "unknown");
        assert_eq!(reason_for_sending(200), "unknown");
    }

    #[test]
    fn test_cme_error_codes() {
        assert_eq!(cme_error("35"), "Syntax error");
        assert_eq!(cme_error("99"), "unknown");
    }

    #[test]
    fn test_device_status_codes() {
        assert_eq!(device_status("54009"), "Registered in TMO, active");
        assert_eq!(device_status("1"), "unknown");
    }
}
