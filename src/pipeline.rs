//! Fetch, build, classify, then the four extraction passes.

use log::{debug, info};

use crate::classify::classify;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{normalize_title, Fetcher};
use crate::resolve::TranslationResolver;
use crate::section::Section;
use crate::translit::{NoTransliteration, Transliterator};
use crate::tree::build_tree;
use crate::walk::{run_pass, Extractor, Pass};

pub struct Pipeline {
    fetcher: Box<dyn Fetcher>,
    transliterator: Box<dyn Transliterator>,
    config: Config,
}

impl Pipeline {
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            transliterator: Box::new(NoTransliteration),
            config: Config::default(),
        }
    }

    pub fn with_transliterator(mut self, transliterator: impl Transliterator + 'static) -> Self {
        self.transliterator = Box::new(transliterator);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The structured entry for `title`, or `None` when the fetcher has no
    /// content for it.
    pub fn process(&self, title: &str) -> Result<Option<Section>> {
        self.process_chained(title, &mut Vec::new())
    }

    /// Run on lines obtained elsewhere. Translation subpages are still fetched.
    pub fn process_lines(&self, title: &str, lines: &[String]) -> Result<Section> {
        let mut chain = vec![normalize_title(title)];
        self.run_on_lines(title, lines, &mut chain)
    }

    pub(crate) fn process_chained(
        &self,
        title: &str,
        chain: &mut Vec<String>,
    ) -> Result<Option<Section>> {
        let lines = match self.fetcher.fetch(title)? {
            Some(lines) => lines,
            None => {
                info!("No content for {}", title);
                return Ok(None);
            }
        };
        info!("Fetched {} ({} lines)", title, lines.len());

        chain.push(normalize_title(title));
        let result = self.run_on_lines(title, &lines, chain);
        chain.pop();
        result.map(Some)
    }

    fn run_on_lines(&self, title: &str, lines: &[String], chain: &mut Vec<String>) -> Result<Section> {
        let mut tree = build_tree(lines);
        classify(&mut tree, &self.config.taxonomy);

        let translations = Pass::new(Extractor::Translations(&*self.transliterator));
        let mut resolver = TranslationResolver::new(self, title, chain);
        run_pass(&mut tree, &translations, Some(&mut resolver))?;

        for extractor in [Extractor::Onyms, Extractor::Terms, Extractor::Pronunciation] {
            debug!("{:?} pass over {}", extractor, title);
            run_pass(&mut tree, &Pass::new(extractor), None)?;
        }
        Ok(tree)
    }
}
