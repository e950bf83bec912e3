use crate::helpers::{newsletters_payload, spawn_app, DATA_PATH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn a_known_id_renders_the_article_with_a_table_of_contents() {
    // Arrange
    let app = spawn_app().await;
    let payload = serde_json::json!({
        "newsletters": [{
            "id": "abc",
            "title": "Agents & Memory",
            "date": "2025-12-02",
            "summary": "s",
            "tags": [],
            "content_html": "<h2>One</h2><p>a</p><h2>Two</h2><h3>Three</h3>"
        }]
    });
    app.serve_newsletters(payload, 1).await;

    // Act
    let response = app.get_newsletter("id=abc").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("<title>Agents &amp; Memory</title>"));
    assert!(html.contains("<h1>Agents &amp; Memory</h1>"));
    assert!(html.contains("Published on 2025-12-02"));
    assert!(html.contains(r#"<h2 id="section-0">One</h2>"#));
    assert!(html.contains(r#"<h2 id="section-1">Two</h2>"#));
    assert!(html.contains(r#"<h3 id="section-2">Three</h3>"#));
    assert!(html.contains(r##"<li><a href="#section-2">Three</a></li>"##));
    assert!(!html.contains(r#"id="table-of-contents" hidden"#));
}

#[tokio::test]
async fn an_unknown_id_renders_not_found_and_leaves_the_header_empty() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(3), 1).await;

    let response = app.get_newsletter("id=issue-99").await;

    assert_eq!(response.status().as_u16(), 404);
    let html = response.text().await.unwrap();
    assert!(html.contains("<p>Newsletter not found.</p>"));
    assert!(html.contains(r#"<div id="article-header"></div>"#));
}

#[tokio::test]
async fn ids_are_matched_case_sensitively() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(3), 1).await;

    let response = app.get_newsletter("id=ISSUE-1").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn without_an_id_nothing_is_fetched_or_rendered() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(3), 0).await;

    let response = app.get_newsletter("").await;

    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"<div id="article-content"></div>"#));
}

#[tokio::test]
async fn an_empty_id_is_treated_as_no_id() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(3), 0).await;

    let response = app.get_newsletter("id=").await;

    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"<div id="article-content"></div>"#));
    assert!(!html.contains("Newsletter not found."));
}

#[tokio::test]
async fn articles_without_headings_hide_the_table_of_contents() {
    let app = spawn_app().await;
    let payload = serde_json::json!({
        "newsletters": [{
            "id": "plain",
            "title": "Plain",
            "date": "2025-01-01",
            "content_html": "<p>No sections</p>"
        }]
    });
    app.serve_newsletters(payload, 1).await;

    let html = app.get_newsletter("id=plain").await.text().await.unwrap();

    assert!(html.contains(r#"<div id="table-of-contents" hidden></div>"#));
}

#[tokio::test]
async fn index_cards_link_to_their_articles() {
    let app = spawn_app().await;
    app.serve_newsletters(newsletters_payload(2), 2).await;
    let index = app.get_index_html("").await;

    let links = app.links_to(&index, "/newsletter.html");
    assert_eq!(links.len(), 2);
    let html = app
        .api_client
        .get(links[0].clone())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("<h1>Issue number 1</h1>"));
}

#[tokio::test]
async fn the_article_fails_when_the_collection_cannot_be_fetched() {
    let app = spawn_app().await;
    Mock::given(path(DATA_PATH))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.data_server)
        .await;

    let response = app.get_newsletter("id=abc").await;

    assert_eq!(response.status().as_u16(), 500);
}
