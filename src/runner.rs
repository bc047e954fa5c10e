//! Render pipeline
//!
//! parse → resolve bindings → evaluate → HTML → layout → write → persist caches
//!
//! Nothing is persisted unless the page was written.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use crate::config::RenderOptions;
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::html;
use crate::markdown::MarkdownTransform;
use crate::parser;
use crate::posts;
use crate::runtime::EvalContext;
use crate::store::DataDirStore;

/// Summary of a finished render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub out: PathBuf,
    pub bindings: usize,
    pub bytes: usize,
}

pub struct Runner {
    options: RenderOptions,
}

impl Runner {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render with the HTTP fetcher and today's date
    pub fn run(&self) -> Result<RenderReport> {
        fs::create_dir_all(&self.options.data_dir)?;
        let mut fetcher = HttpFetcher::new(DataDirStore::new(&self.options.data_dir))?;
        self.run_with(&mut fetcher, Local::now().date_naive())
    }

    /// Render with an injected fetcher and a fixed date
    #[instrument(skip_all, fields(input = %self.options.input.display()))]
    pub fn run_with(&self, fetcher: &mut dyn Fetcher, today: NaiveDate) -> Result<RenderReport> {
        let opts = &self.options;

        let source = fs::read_to_string(&opts.input)?;
        let doc = parser::parse(&source)?;

        fs::create_dir_all(&opts.data_dir)?;
        let mut store = DataDirStore::new(&opts.data_dir);

        let page = {
            let mut ctx = EvalContext::new(&doc, &store, &mut *fetcher)?;

            if let Some(cfg) = &opts.posts {
                let posts = posts::load_posts(&cfg.pattern)?;
                ctx.insert_eager(&cfg.name, serde_json::to_value(posts)?)?;
            }

            let blocks = ctx.evaluate(&doc.nodes, &MarkdownTransform);
            let body = html::render_blocks(&blocks);

            let layout = fs::read_to_string(&opts.layout)?;
            let page = html::apply_layout(&layout, &body, today, &opts.layout.display().to_string())?;

            if let Some(parent) = opts.out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&opts.out, &page)?;

            ctx.persist(&mut store)?;
            page
        };
        fetcher.persist()?;

        info!(out = %opts.out.display(), bytes = page.len(), "page rendered");
        Ok(RenderReport {
            out: opts.out.clone(),
            bindings: doc.bindings.len() + usize::from(opts.posts.is_some()),
            bytes: page.len(),
        })
    }
}
