//! Unit tests for error handling

use super::*;
use std::io;

#[cfg(test)]
mod ingest_error_tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = IngestError::from(json_error);

        match error {
            IngestError::Json(_) => (),
            _ => panic!("Expected Json error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = IngestError::from(io_error);

        match error {
            IngestError::Io(_) => (),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_invalid_header_error_conversion() {
        let header_error = reqwest::header::HeaderValue::from_str("invalid\nheader").unwrap_err();
        let error = IngestError::from(header_error);

        match error {
            IngestError::InvalidHeader(_) => (),
            _ => panic!("Expected InvalidHeader error variant"),
        }
    }

    #[test]
    fn test_store_error_conversion() {
        let error = IngestError::from(anyhow::anyhow!("disk full"));

        match &error {
            IngestError::Store(_) => (),
            _ => panic!("Expected Store error variant"),
        }
        assert!(error.to_string().contains("disk full"));
    }

    #[test]
    fn test_invalid_day_offset_message() {
        let error = IngestError::InvalidDayOffset { offset: 3, max: 2 };
        let message = error.to_string();

        assert!(message.contains("Invalid day offset 3"));
        assert!(message.contains("between 0 and 2"));
    }

    #[test]
    fn test_insufficient_statistics_message() {
        let error = IngestError::InsufficientStatistics { groups: 2 };
        assert_eq!(
            error.to_string(),
            "Insufficient match statistics: 2 of 3 required groups present"
        );
    }
}

#[cfg(test)]
mod payload_tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_400() {
        let payload = IngestError::InvalidDayOffset { offset: 3, max: 2 }.to_payload();

        assert_eq!(payload.status, 400);
        assert!(payload.error.contains("Invalid day offset"));
    }

    #[test]
    fn test_invalid_date_is_invalid_input() {
        let error = IngestError::InvalidDate {
            value: "yesterday".to_string(),
        };
        assert!(error.is_invalid_input());
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_pipeline_failures_map_to_500() {
        let error = IngestError::NoData {
            url: "https://example.test/event/1/lineups".to_string(),
        };
        assert!(!error.is_invalid_input());
        assert_eq!(error.to_payload().status, 500);
    }

    #[test]
    fn test_payload_serializes_status_and_error() {
        let payload = IngestError::InvalidDayOffset { offset: -1, max: 2 }.to_payload();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["status"], 400);
        assert!(json["error"].as_str().unwrap().contains("-1"));
    }
}
