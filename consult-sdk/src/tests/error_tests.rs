//! Tests for error handling
//!
//! These tests verify the error taxonomy, context propagation and the
//! localized messages shown for each kind of failure.

#[cfg(test)]
mod tests {
    use crate::config::{ErrorMessages, Widget};
    use crate::error::{ErrorContext, ErrorKind, ServiceError};

    #[test]
    fn test_error_display() {
        assert_eq!(
            ServiceError::QueryTooShort { min: 10, actual: 4 }.to_string(),
            "Query too short: 4 characters, at least 10 required"
        );
        assert_eq!(ServiceError::http(404, "Not Found").to_string(), "HTTP 404: Not Found");
        assert_eq!(
            ServiceError::timeout("30s elapsed").to_string(),
            "Timeout error: 30s elapsed"
        );
    }

    #[test]
    fn test_kind_classification() {
        let cases = vec![
            (ServiceError::QueryEmpty, ErrorKind::QueryEmpty),
            (ServiceError::QueryTooShort { min: 10, actual: 3 }, ErrorKind::QueryTooShort),
            (ServiceError::network("refused"), ErrorKind::NetworkError),
            (ServiceError::timeout("slow"), ErrorKind::TimeoutError),
            (ServiceError::invalid_response("null"), ErrorKind::InvalidResponseShape),
            (ServiceError::rejected("success: false"), ErrorKind::InvalidResponseShape),
            (ServiceError::http(500, "Internal Server Error"), ErrorKind::HttpError),
            (ServiceError::RatingRequired, ErrorKind::RatingRequired),
            (ServiceError::configuration_missing("no url"), ErrorKind::ConfigurationMissing),
            (ServiceError::storage("disk full"), ErrorKind::Internal),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{}", error);
        }
    }

    #[test]
    fn test_context_is_transparent() {
        let context = ErrorContext::for_service("n8n")
            .endpoint("https://example.test/chat")
            .request_id("req-1")
            .with("attempt", "1");

        let error = ServiceError::http(502, "Bad Gateway").with_context(context);

        assert_eq!(error.kind(), ErrorKind::HttpError);
        assert_eq!(error.status_code(), Some(502));
        assert_eq!(error.to_string(), "HTTP 502: Bad Gateway");

        let context = error.context().unwrap();
        assert_eq!(context.service, "n8n");
        assert_eq!(context.request_id.as_deref(), Some("req-1"));
        assert_eq!(context.data.get("attempt").map(String::as_str), Some("1"));
        assert!(matches!(error.root(), ServiceError::Http { status: 502, .. }));
    }

    #[test]
    fn test_validation_errors() {
        assert!(ServiceError::QueryEmpty.is_validation());
        assert!(ServiceError::RatingRequired.is_validation());
        assert!(!ServiceError::network("down").is_validation());
    }

    #[test]
    fn test_user_messages() {
        let educational = ErrorMessages::for_widget(Widget::Educational);
        let real_estate = ErrorMessages::for_widget(Widget::RealEstate);

        assert_eq!(
            ServiceError::timeout("slow").user_message(&educational),
            "انتهت مهلة الاستجابة. يرجى المحاولة مرة أخرى."
        );
        assert_eq!(
            ServiceError::http(500, "Internal Server Error").user_message(&real_estate),
            real_estate.server_error
        );
        assert_eq!(
            ServiceError::QueryEmpty.user_message(&educational),
            "يرجى كتابة استفسارك التعليمي"
        );
        assert_eq!(
            ServiceError::QueryEmpty.user_message(&real_estate),
            "يرجى كتابة استفسارك العقاري"
        );
        assert_eq!(
            ServiceError::RatingRequired.user_message(&real_estate),
            "يرجى اختيار تقييم أولاً"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ServiceError = err.into();
        assert!(matches!(error.root(), ServiceError::Parsing(_)));
        assert_eq!(error.context().unwrap().service, "json");
    }
}
