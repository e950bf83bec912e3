use crate::adapters::{FileNewsletterStore, HttpNewsletterStore};
use crate::configuration::{Settings, SourceKind, SourceSettings};
use crate::domain::NewsletterStore;
use crate::routes::{health_check, index, newsletter, SiteContext};
use actix_web::dev::{Server, Service};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web::Data;
use actix_web::{web, App, HttpMessage, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use telemetry::CustomLevelRootSpanBuilder;
use tracing_actix_web::{RequestId, TracingLogger};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        ))?;

        let port = listener.local_addr()?.port();
        let store = build_newsletter_store(&configuration.source)?;
        let site = SiteContext {
            title: configuration.site.title,
            base_url: configuration.application.base_url,
            page_size: configuration.site.page_size,
            greeting: configuration.site.greeting,
        };

        let server = run(listener, store, site)?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn build_newsletter_store(
    source: &SourceSettings,
) -> Result<Arc<dyn NewsletterStore>, anyhow::Error> {
    let store: Arc<dyn NewsletterStore> = match source.kind {
        SourceKind::Http => {
            let url = source
                .url
                .clone()
                .context("source.url is required when source.kind is http")?;
            Arc::new(HttpNewsletterStore::new(url, source.timeout())?)
        }
        SourceKind::File => {
            let path = source
                .path
                .clone()
                .context("source.path is required when source.kind is file")?;
            Arc::new(FileNewsletterStore::new(path))
        }
    };

    Ok(store)
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn NewsletterStore>,
    site: SiteContext,
) -> Result<Server, anyhow::Error> {
    let store_data: Data<dyn NewsletterStore> = Data::from(store);
    let site_data = Data::new(site);

    let server = HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let request_id = req.extensions().get::<RequestId>().copied();
                let res = srv.call(req);
                async move {
                    let mut res = res.await?;
                    if let Some(request_id) = request_id {
                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            res.headers_mut()
                                .insert(HeaderName::from_static("x-request-id"), value);
                        }
                    }
                    Ok(res)
                }
            })
            .wrap(TracingLogger::<CustomLevelRootSpanBuilder>::new())
            .route("/", web::get().to(index))
            .route("/index.html", web::get().to(index))
            .route("/newsletter.html", web::get().to(newsletter))
            .route("/health_check", web::get().to(health_check))
            .app_data(store_data.clone())
            .app_data(site_data.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
