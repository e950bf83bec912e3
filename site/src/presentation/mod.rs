mod container;
mod controller;
pub mod html;
mod toc;
mod view;

pub use container::Container;
pub use controller::{
    generate_toc, load_article, render_article, ArticleOutcome, PageState,
    PresentationController, DEFAULT_PAGE_SIZE, NOT_FOUND_HTML,
};
pub use toc::{anchor_headings, render_toc, TocEntry};
pub use view::{ArticleView, IndexView};
