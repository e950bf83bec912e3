use crate::helpers::{card_count, newsletters_payload, spawn_app, DATA_PATH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn the_index_shows_the_first_page_newest_first() {
    // Arrange
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(23), 1).await;

    // Act
    let response = app.get_index("").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert_eq!(card_count(&html), 9);
    let newest = html.find("Issue number 22").unwrap();
    let next = html.find("Issue number 21").unwrap();
    assert!(newest < next);
    assert!(!html.contains("Issue number 13<"));
    assert!(html.contains(r#"aria-disabled="true">Prev</span>"#));
    assert!(!html.contains("scrollTo"));
}

#[tokio::test]
async fn the_last_page_holds_the_remainder_and_disables_next() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(23), 1).await;

    let html = app.get_index_html("page=3").await;

    assert_eq!(card_count(&html), 5);
    assert!(html.contains("Issue number 4<"));
    assert!(html.contains("Issue number 0<"));
    assert!(html.contains(r#"aria-disabled="true">Next</span>"#));
    assert!(html.contains(">Prev</a>"));
    assert!(html.contains("scrollTo"));
}

#[tokio::test]
async fn pagination_links_lead_to_the_next_page() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(23), 2).await;
    let html = app.get_index_html("").await;

    let page_two = app
        .links_to(&html, "/")
        .into_iter()
        .find(|link| link.query() == Some("page=2"))
        .expect("No link to page 2");
    let html = app
        .api_client
        .get(page_two)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(card_count(&html), 9);
    assert!(html.contains("Issue number 13<"));
    assert!(html.contains(r#"class="page-btn active" aria-current="page""#));
}

#[tokio::test]
async fn a_single_page_of_results_has_no_pagination_controls() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(4), 1).await;

    let html = app.get_index_html("").await;

    assert_eq!(card_count(&html), 4);
    assert!(html.contains(r#"<div id="pagination"></div>"#));
}

#[tokio::test]
async fn search_matches_titles_and_summaries_case_insensitively() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(23), 1).await;

    let html = app.get_index_html("q=WEEK%202").await;

    // Week 2 and weeks 20 to 22
    assert_eq!(card_count(&html), 4);
    assert!(html.contains(r#"value="WEEK 2""#));
    assert!(html.contains(r#"<div id="pagination"></div>"#));
}

#[tokio::test]
async fn a_search_without_matches_renders_an_empty_page() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(23), 1).await;

    let html = app.get_index_html("q=kubernetes").await;

    assert_eq!(card_count(&html), 0);
    assert!(html.contains(r#"<div id="newsletter-list"></div>"#));
    assert!(html.contains(r#"<div id="pagination"></div>"#));
}

#[tokio::test]
async fn an_empty_search_returns_everything() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(23), 1).await;

    let html = app.get_index_html("q=").await;

    assert_eq!(card_count(&html), 9);
    assert!(html.contains(">3</a>"));
}

#[tokio::test]
async fn the_configured_greeting_is_shown() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(1), 1).await;

    let html = app.get_index_html("").await;

    assert!(html.contains(r#"<div id="greeting">"#));
}

#[tokio::test]
async fn malformed_entries_are_skipped() {
    let app = spawn_app().await;
    let mut payload = newsletters_payload(2);
    payload["newsletters"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({"id": "broken", "title": "No date"}));
    app.serve_newsletters(payload, 1).await;

    let html = app.get_index_html("").await;

    assert_eq!(card_count(&html), 2);
    assert!(!html.contains("No date"));
}

#[tokio::test]
async fn the_index_fails_when_the_collection_cannot_be_fetched() {
    let app = spawn_app().await;
    Mock::given(path(DATA_PATH))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.data_server)
        .await;

    let response = app.get_index("").await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn the_index_fails_when_the_document_is_not_json() {
    let app = spawn_app().await;
    Mock::given(path(DATA_PATH))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&app.data_server)
        .await;

    let response = app.get_index("").await;

    assert_eq!(response.status().as_u16(), 500);
}
