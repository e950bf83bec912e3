use chrono::{Days, NaiveDate};
use newsletter_site::configuration::{get_configuration, SourceKind};
use newsletter_site::startup::Application;
use once_cell::sync::Lazy;
use telemetry::{get_subscriber, init_subscriber};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const DATA_PATH: &str = "/data/newsletters.json";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub data_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Serve `payload` as the static newsletter document, expecting `fetches` loads.
    pub async fn serve_newsletters(&self, payload: serde_json::Value, fetches: u64) {
        Mock::given(path(DATA_PATH))
            .and(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .expect(fetches)
            .mount(&self.data_server)
            .await;
    }

    pub async fn get_index(&self, query: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/?{}", &self.address, query))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_index_html(&self, query: &str) -> String {
        self.get_index(query).await.text().await.unwrap()
    }

    pub async fn get_newsletter(&self, query: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/newsletter.html?{}", &self.address, query))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Absolute links in a rendered page whose path starts with `prefix`.
    ///
    /// Links are rendered against the configured base url, so the port of the
    /// running test application is patched in.
    pub fn links_to(&self, html: &str, prefix: &str) -> Vec<reqwest::Url> {
        linkify::LinkFinder::new()
            .links(html)
            .filter(|l| *l.kind() == linkify::LinkKind::Url)
            .map(|l| {
                let mut link = reqwest::Url::parse(l.as_str()).unwrap();
                // Let's make sure we don't call random APIs on the web
                assert_eq!(link.host_str().unwrap(), "127.0.0.1");
                link.set_port(Some(self.port)).unwrap();
                link
            })
            .filter(|link| link.path().starts_with(prefix))
            .collect()
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    // Launch a mock server to stand in for the static file host
    let data_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.port = 0;
        c.application.host = "127.0.0.1".to_string();
        c.application.base_url = "http://127.0.0.1".to_string();
        // Use the mock server as the newsletter source
        c.source.kind = SourceKind::Http;
        c.source.url = Some(format!("{}{}", data_server.uri(), DATA_PATH));
        c.source.timeout_milliseconds = 2_000;
        c
    };

    // Launch the application as a background task
    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        port: application_port,
        data_server,
        api_client: reqwest::Client::new(),
    }
}

/// A document of `count` newsletters, issue `n` published `n` days after 2024-01-01.
pub fn newsletters_payload(count: usize) -> serde_json::Value {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let newsletters: Vec<serde_json::Value> = (0..count)
        .map(|n| {
            let date = first.checked_add_days(Days::new(n as u64)).unwrap();
            serde_json::json!({
                "id": format!("issue-{n}"),
                "title": format!("Issue number {n}"),
                "date": date.format("%Y-%m-%d").to_string(),
                "summary": format!("Everything that happened in week {n}"),
                "tags": ["AI"],
                "content_html": format!("<h2>Week {n}</h2><p>Body of issue {n}</p>")
            })
        })
        .collect();

    serde_json::json!({ "newsletters": newsletters })
}

pub fn card_count(html: &str) -> usize {
    html.matches(r#"class="card""#).count()
}
