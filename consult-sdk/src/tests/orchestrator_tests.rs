//! Tests for query orchestration
//!
//! These tests verify validation, provenance tagging and the degradation to
//! the local responder against a mocked webhook.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::{ConsultConfig, Widget};
    use crate::core::LocalEnvironment;
    use crate::error::ErrorKind;
    use crate::orchestrator::{AnswerSource, QueryOrchestrator, SubmitOptions};
    use crate::services::fallback::{LocalResponder, FALLBACK_MODEL, KEYWORD_MATCH_CONFIDENCE};
    use crate::services::webhook::WebhookClient;

    fn create_orchestrator(
        mock_server: &MockServer,
        widget: Widget,
        environment: LocalEnvironment,
    ) -> QueryOrchestrator {
        let mut config = ConsultConfig::for_widget(widget);
        config.webhook_url = format!("{}/chat", mock_server.uri());
        config.timeout = Duration::from_millis(500);

        let environment = Arc::new(environment);
        let client = WebhookClient::new(Client::new(), &config, environment.clone());
        QueryOrchestrator::new(client, LocalResponder::new(widget), environment)
    }

    fn no_fallback() -> SubmitOptions {
        SubmitOptions { fallback_enabled: false }
    }

    #[tokio::test]
    async fn test_short_query_never_reaches_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "t"})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let orchestrator =
            create_orchestrator(&mock_server, Widget::Educational, LocalEnvironment::new());

        let err = orchestrator.submit("قصير", SubmitOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryTooShort);

        let err = orchestrator.submit("   ", SubmitOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryEmpty);
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_webhook_answer_is_tagged() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "X"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let orchestrator =
            create_orchestrator(&mock_server, Widget::RealEstate, LocalEnvironment::new());
        let result = orchestrator
            .submit("كيف أبدأ في الاستثمار العقاري؟", SubmitOptions::default())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.source, AnswerSource::Webhook);
        assert_eq!(result.data.answer, "X");
        assert!(result.original_error.is_none());

        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["source"], "n8n");
        assert!(serialized["responseTime"].is_u64());
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_keyword() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let orchestrator =
            create_orchestrator(&mock_server, Widget::Educational, LocalEnvironment::new());
        let result = orchestrator
            .submit("كيف أطور مهاراتي في الكتابة؟", SubmitOptions::default())
            .await
            .unwrap();

        assert_eq!(result.source, AnswerSource::Fallback);
        assert_eq!(result.data.model, FALLBACK_MODEL);
        assert_eq!(result.data.confidence, KEYWORD_MATCH_CONFIDENCE);
        assert_eq!(result.data.recommendations.len(), 3);
        assert!(result.data.answer.contains("الكتابة"));
        assert!(result.original_error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_timeout_falls_back_within_deadline() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"text": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let orchestrator =
            create_orchestrator(&mock_server, Widget::RealEstate, LocalEnvironment::new());
        let result = orchestrator
            .submit("أبحث عن شقة للإيجار في الرياض", SubmitOptions::default())
            .await
            .unwrap();

        assert_eq!(result.source, AnswerSource::Fallback);
        assert!(result.response_time >= Duration::from_millis(500));
        assert!(result.response_time < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_failure_without_fallback_propagates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let orchestrator =
            create_orchestrator(&mock_server, Widget::RealEstate, LocalEnvironment::new());
        let err = orchestrator
            .submit("ما هي أفضل طريقة للاستثمار؟", no_fallback())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::HttpError);
        assert_eq!(err.status_code(), Some(502));
    }

    #[tokio::test]
    async fn test_offline_skips_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "t"})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let environment = LocalEnvironment::new().with_online(false);
        let orchestrator = create_orchestrator(&mock_server, Widget::RealEstate, environment);

        let result = orchestrator
            .submit("ما هي أفضل طريقة للاستثمار؟", SubmitOptions::default())
            .await
            .unwrap();
        assert_eq!(result.source, AnswerSource::Fallback);

        let err = orchestrator
            .submit("ما هي أفضل طريقة للاستثمار؟", no_fallback())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
    }

    #[tokio::test]
    async fn test_connectivity_flag_is_live() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "online"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let environment = LocalEnvironment::new().with_online(false);
        let connectivity = environment.connectivity();
        let orchestrator = create_orchestrator(&mock_server, Widget::Educational, environment);

        let offline = orchestrator
            .submit("كيف أستعد للامتحان النهائي؟", SubmitOptions::default())
            .await
            .unwrap();
        assert_eq!(offline.source, AnswerSource::Fallback);

        connectivity.store(true, std::sync::atomic::Ordering::SeqCst);
        let online = orchestrator
            .submit("كيف أستعد للامتحان النهائي؟", SubmitOptions::default())
            .await
            .unwrap();
        assert_eq!(online.source, AnswerSource::Webhook);
        assert_eq!(online.data.answer, "online");
    }

    #[tokio::test]
    async fn test_academic_writing_query_uses_writing_entry() {
        const QUERY: &str = "كيف أحسن مهاراتي في الكتابة الأكاديمية؟";

        let writing = LocalResponder::new(Widget::Educational)
            .matching_entry(QUERY)
            .unwrap();
        assert_eq!(writing.keyword, "كتابة");

        let failing_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&failing_server)
            .await;
        let online =
            create_orchestrator(&failing_server, Widget::Educational, LocalEnvironment::new());

        let idle_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "t"})))
            .expect(0)
            .mount(&idle_server)
            .await;
        let offline = create_orchestrator(
            &idle_server,
            Widget::Educational,
            LocalEnvironment::new().with_online(false),
        );

        for orchestrator in [online, offline] {
            let result = orchestrator.submit(QUERY, SubmitOptions::default()).await.unwrap();

            assert_eq!(result.source, AnswerSource::Fallback);
            assert_eq!(result.data.answer, writing.answer);
            assert_eq!(result.data.recommendations, writing.recommendations);
            assert_eq!(result.data.confidence, 0.7);
            assert_eq!(result.data.confidence, KEYWORD_MATCH_CONFIDENCE);
            assert_eq!(result.data.model, FALLBACK_MODEL);
            let original_error = result.original_error.unwrap();
            assert!(!original_error.is_empty());
        }
    }
}
