// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use trail_predictor::error::{UpstreamError, UpstreamErrorClass};

#[test]
fn test_unavailable_class() {
    let errors = [
        UpstreamError::Timeout { service: "strava" },
        UpstreamError::Unreachable {
            service: "strava",
            message: "connection refused".to_string(),
        },
        UpstreamError::Status {
            service: "open-meteo",
            status: 503,
        },
    ];

    for err in errors {
        assert_eq!(err.class(), UpstreamErrorClass::ExternalServiceUnavailable);
        assert!(err.is_expected());
    }
}

#[test]
fn test_malformed_class() {
    let err = UpstreamError::Malformed {
        service: "open-meteo",
        message: "missing field `weathercode`".to_string(),
    };
    assert_eq!(err.class(), UpstreamErrorClass::MalformedUpstreamResponse);
    assert!(err.is_expected());
    assert_eq!(err.kind(), "malformed");
}

#[test]
fn test_unexpected_is_not_expected() {
    let err = UpstreamError::Unexpected {
        service: "strava",
        message: "builder error".to_string(),
    };
    assert!(!err.is_expected());
    assert_eq!(err.kind(), "unexpected");
    assert_eq!(err.to_string(), "strava request failed: builder error");
}
