use serde_json::json;
use serial_test::serial;
use skinscan_api_client::{predict_with_retry, ApiClient, ApiError};
use skinscan_core::{
    AnalysisRequest, ClientConfig, ConfidenceLevel, ErrorKind, ImageOrigin, RequestId,
    SelectedImage, SeverityLevel, SymptomSet,
};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ========================================
// Helpers
// ========================================

/// Let the client reach the local mock servers
fn disable_proxy_for_test() {
    std::env::remove_var("HTTP_PROXY");
    std::env::remove_var("HTTPS_PROXY");
    std::env::remove_var("http_proxy");
    std::env::remove_var("https_proxy");
    std::env::set_var("NO_PROXY", "localhost,127.0.0.1");
}

fn config_for(base: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: format!("{}/api", base),
        retry_base_delay: Duration::from_millis(100),
        ..ClientConfig::default()
    }
}

fn client_for(base: &str) -> ApiClient {
    ApiClient::new(config_for(base)).unwrap()
}

fn request(symptoms: &[&str]) -> AnalysisRequest {
    let mut set = SymptomSet::default();
    for s in symptoms {
        set.add(s).unwrap();
    }
    AnalysisRequest {
        id: RequestId(1),
        image: SelectedImage::new(
            "photo.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3],
            ImageOrigin::FilePicker,
        ),
        symptoms: set,
    }
}

fn eczema_body() -> serde_json::Value {
    json!({
        "success": true,
        "prediction": {
            "disease": "Eczema",
            "confidence": 0.87,
            "confidence_level": "high",
            "top_predictions": [
                {"disease": "Eczema", "confidence": 0.87},
                {"disease": "Psoriasis", "confidence": 0.08}
            ],
            "needs_review": false
        },
        "severity": {"level": "moderate", "urgency": "consult_doctor", "explanation": "..."},
        "recommendations": {"general_advice": "Moisturize", "immediate_care": []},
        "disclaimer": "Not a diagnosis"
    })
}

// ========================================
// submit_analysis
// ========================================

#[tokio::test]
#[serial]
async fn test_submit_analysis_success() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .and(body_string_contains("name=\"symptoms\""))
        .and(body_string_contains("itching,redness"))
        .respond_with(ResponseTemplate::new(200).set_body_json(eczema_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut progress = Vec::new();
    let result = client_for(&server.uri())
        .submit_analysis(&request(&["itching", "redness"]), |p| progress.push(p))
        .await;

    assert!(result.is_ok(), "Expected Ok but got: {:?}", result);
    let result = result.unwrap();
    assert_eq!(result.prediction.disease, "Eczema");
    assert_eq!(result.prediction.confidence_level, ConfidenceLevel::High);
    assert_eq!(result.severity.level, SeverityLevel::Moderate);
    assert_eq!(result.prediction.alternatives.len(), 1);
    assert_eq!(progress, vec![10, 50, 80, 100]);
}

#[tokio::test]
#[serial]
async fn test_multipart_carries_image_and_omits_empty_symptoms() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(eczema_body()))
        .mount(&server)
        .await;

    client_for(&server.uri())
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("name=\"image\""));
    assert!(body.contains("filename=\"photo.jpg\""));
    assert!(body.contains("image/jpeg"));
    assert!(!body.contains("name=\"symptoms\""));
}

#[tokio::test]
#[serial]
async fn test_bad_request_is_invalid_image() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid or corrupted image"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::InvalidRequest("Invalid or corrupted image".to_string()));
    let descriptor = err.to_descriptor();
    assert_eq!(descriptor.kind, ErrorKind::InvalidImage);
    assert_eq!(descriptor.message, "Invalid or corrupted image");
}

#[tokio::test]
#[serial]
async fn test_payload_too_large() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(413).set_body_json(json!({"error": "File too large"})))
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::PayloadTooLarge);
}

#[tokio::test]
#[serial]
async fn test_success_false_is_rejected() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "No skin detected"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected("No skin detected".to_string()));
}

#[tokio::test]
#[serial]
async fn test_undecodable_success_is_server_error() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
    assert_eq!(err.to_descriptor().kind, ErrorKind::Server);
}

#[tokio::test]
#[serial]
async fn test_timeout_is_classified() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(eczema_body())
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        request_timeout: Duration::from_millis(200),
        ..config_for(&server.uri())
    };
    let err = ApiClient::new(config)
        .unwrap()
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout);
    assert_eq!(err.to_descriptor().kind, ErrorKind::Timeout);
}

#[tokio::test]
#[serial]
async fn test_unreachable_server_is_network_error() {
    disable_proxy_for_test();

    // Nothing listens here
    let err = client_for("http://127.0.0.1:9")
        .submit_analysis(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    assert_eq!(err.to_descriptor().kind, ErrorKind::Network);
}

// ========================================
// predict_with_retry
// ========================================

#[tokio::test]
#[serial]
async fn test_retry_after_server_error() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(eczema_body()))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let mut progress = Vec::new();
    let started = Instant::now();
    let result = client
        .predict_with_retry(&request(&["itching"]), |p| progress.push(p))
        .await;

    assert!(result.is_ok(), "Expected Ok but got: {:?}", result);
    assert!(started.elapsed() >= client.config().retry_base_delay);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    // Progress never moves backwards across attempts
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(progress.last(), Some(&100));
}

#[tokio::test]
#[serial]
async fn test_retry_on_rate_limit() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(eczema_body()))
        .mount(&server)
        .await;

    let result = client_for(&server.uri())
        .predict_with_retry(&request(&[]), |_| {})
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
#[serial]
async fn test_no_retry_on_client_error() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .predict_with_retry(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound);
    assert_eq!(err.to_descriptor().kind, ErrorKind::Critical);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_retries_are_bounded() {
    disable_proxy_for_test();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = ClientConfig {
        max_retries: 2,
        retry_base_delay: Duration::from_millis(10),
        ..config_for(&server.uri())
    };
    let err = ApiClient::new(config)
        .unwrap()
        .predict_with_retry(&request(&[]), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 503, .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn test_free_function_reads_environment() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;
    std::env::set_var("API_BASE_URL", format!("{}/api", server.url()));
    std::env::set_var("API_RETRY_BASE_DELAY_MS", "10");

    let mock = server
        .mock("POST", "/api/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(eczema_body().to_string())
        .create_async()
        .await;

    let result = predict_with_retry(&request(&[]), |_| {}).await;
    std::env::remove_var("API_BASE_URL");
    std::env::remove_var("API_RETRY_BASE_DELAY_MS");

    assert!(result.is_ok(), "Expected Ok but got: {:?}", result);
    mock.assert_async().await;
}

// ========================================
// Reference endpoints
// ========================================

#[tokio::test]
#[serial]
async fn test_health() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"status": "ok", "model_loaded": true, "num_classes": 6, "version": "0.1.0"})
                .to_string(),
        )
        .create_async()
        .await;

    let health = client_for(&server.url()).health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.model_loaded);
    assert_eq!(health.num_classes, 6);
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_diseases_and_symptoms() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let _diseases = server
        .mock("GET", "/api/diseases")
        .with_status(200)
        .with_body(
            json!([{"name": "Acne", "description": "Clogged pores", "baseline_severity": "mild"}])
                .to_string(),
        )
        .create_async()
        .await;
    let _symptoms = server
        .mock("GET", "/api/symptoms")
        .with_status(200)
        .with_body(
            json!({"categories": [{"name": "Sensations", "symptoms": ["itching"]}], "all": ["itching"]})
                .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server.url());
    let diseases = client.diseases().await.unwrap();
    assert_eq!(diseases[0].name, "Acne");
    assert_eq!(diseases[0].baseline_severity, SeverityLevel::Mild);

    let catalog = client.symptoms().await.unwrap();
    assert_eq!(catalog.all, vec!["itching".to_string()]);
}

#[tokio::test]
#[serial]
async fn test_reference_endpoint_server_error() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/health")
        .with_status(503)
        .with_body(json!({"error": "Model not loaded"}).to_string())
        .create_async()
        .await;

    let err = client_for(&server.url()).health().await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 503, .. }));
}
