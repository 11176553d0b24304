//! Where article text comes from.
//!
//! A fetcher returns the raw wikitext of a title split into lines, or `None`
//! when the title does not exist or its source is not in the expected shape.
//! Errors are reserved for the environment (unreadable files).

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

use bzip2::read::BzDecoder;
use indicatif::ProgressBar;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

pub trait Fetcher {
    fn fetch(&self, title: &str) -> Result<Option<Vec<String>>>;
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, title: &str) -> Result<Option<Vec<String>>> {
        (**self).fetch(title)
    }
}

pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// MediaWiki treats underscores as spaces; compare titles in NFC.
pub fn normalize_title(title: &str) -> String {
    title.trim().replace('_', " ").nfc().collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// In memory
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: &str, text: impl Into<String>) {
        self.pages.insert(normalize_title(title), text.into());
    }

    pub fn with_page(mut self, title: &str, text: impl Into<String>) -> Self {
        self.insert(title, text);
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, title: &str) -> Result<Option<Vec<String>>> {
        Ok(self.pages.get(&normalize_title(title)).map(|text| split_lines(text)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saved API responses
// ─────────────────────────────────────────────────────────────────────────────

// action=query&prop=revisions&rvprop=content&format=json&formatversion=2
#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: Option<ApiQuery>,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    pages: Vec<ApiPage>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    #[serde(default)]
    revisions: Vec<ApiRevision>,
}

#[derive(Debug, Deserialize)]
struct ApiRevision {
    content: Option<String>,
    slots: Option<ApiSlots>,
}

#[derive(Debug, Deserialize)]
struct ApiSlots {
    main: ApiSlot,
}

#[derive(Debug, Deserialize)]
struct ApiSlot {
    content: Option<String>,
}

/// Content of the first revision of the first page, as lines. Missing pages
/// and undecodable responses are both absent.
pub fn parse_api_response(title: &str, json: &str) -> Option<Vec<String>> {
    let response: ApiResponse = match serde_json::from_str(json) {
        Ok(response) => response,
        Err(e) => {
            warn!("Malformed api response for {}: {}", title, e);
            return None;
        }
    };
    let revision = response.query?.pages.into_iter().next()?.revisions.into_iter().next()?;
    let content = revision
        .content
        .or_else(|| revision.slots.and_then(|slots| slots.main.content))?;
    Some(split_lines(&content))
}

/// Articles saved under a directory, one file per title. A title maps to
/// `<root>/<title>.wikitext` (raw wikitext) or `<root>/<title>.json` (an api
/// response); subpage titles map to nested directories.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, title: &str, extension: &str) -> Option<PathBuf> {
        let relative = PathBuf::from(format!("{}.{}", normalize_title(title), extension));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }

    fn read(path: &Path) -> Result<Option<String>> {
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(path)
            .map(Some)
            .map_err(|e| Error::io(path, e))
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch(&self, title: &str) -> Result<Option<Vec<String>>> {
        let Some(wikitext) = self.path_for(title, "wikitext") else {
            debug!("Title {} does not map to a file", title);
            return Ok(None);
        };
        if let Some(text) = Self::read(&wikitext)? {
            return Ok(Some(split_lines(&text)));
        }

        let Some(json) = self.path_for(title, "json") else {
            return Ok(None);
        };
        Ok(Self::read(&json)?.and_then(|text| parse_api_response(title, &text)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// XML dumps
// ─────────────────────────────────────────────────────────────────────────────

lazy_static! {
    static ref TITLE_PATTERN: Regex = Regex::new(r"<title>([^<]+)</title>").unwrap();
    static ref TEXT_PATTERN: Regex = Regex::new(r"(?s)<text[^>]*>(.+?)</text>").unwrap();
    static ref REDIRECT_PATTERN: Regex = Regex::new(r#"<redirect\s+title="[^"]+""#).unwrap();
}

fn decode_xml_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Feed each `<page>...</page>` element to `callback` until it returns false.
fn scan_pages(mut reader: impl BufRead, mut callback: impl FnMut(&str) -> bool) -> std::io::Result<()> {
    let mut line = String::new();
    let mut page = String::new();
    let mut in_page = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        if !in_page {
            match line.find("<page>") {
                Some(start) => {
                    in_page = true;
                    page.clear();
                    page.push_str(&line[start..]);
                }
                None => continue,
            }
        } else {
            page.push_str(&line);
        }

        if in_page && line.contains("</page>") {
            in_page = false;
            if !callback(&page) {
                break;
            }
        }
    }

    Ok(())
}

/// Looks titles up in a MediaWiki XML dump (`.xml` or `.xml.bz2`). Every fetch
/// scans the dump from the start.
#[derive(Clone)]
pub struct DumpFetcher {
    path: PathBuf,
    progress: Option<ProgressBar>,
}

impl DumpFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            progress: None,
        }
    }

    /// Tick `progress` for every page scanned. The caller finishes the bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn open(&self) -> Result<Box<dyn BufRead>> {
        let file = File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let reader: Box<dyn BufRead> = if self.path.to_string_lossy().ends_with(".bz2") {
            Box::new(BufReader::with_capacity(256 * 1024, BzDecoder::new(file)))
        } else {
            Box::new(BufReader::with_capacity(256 * 1024, file))
        };
        Ok(reader)
    }
}

impl Fetcher for DumpFetcher {
    fn fetch(&self, title: &str) -> Result<Option<Vec<String>>> {
        let wanted = normalize_title(title);
        let mut found = None;
        let mut scanned = 0usize;

        info!("Scanning {} for {}", self.path.display(), title);
        if let Some(pb) = &self.progress {
            pb.set_position(0);
            pb.set_message(format!("Looking for {}", title));
        }
        scan_pages(self.open()?, |page_xml| {
            scanned += 1;
            if let Some(pb) = &self.progress {
                pb.inc(1);
                if scanned % 10_000 == 0 {
                    pb.set_message(format!("Looking for {} | pages: {}", title, scanned));
                }
            }

            let Some(cap) = TITLE_PATTERN.captures(page_xml) else {
                return true;
            };
            if normalize_title(&decode_xml_entities(&cap[1])) != wanted {
                return true;
            }

            if REDIRECT_PATTERN.is_match(page_xml) {
                debug!("{} is a redirect", title);
            } else if let Some(text) = TEXT_PATTERN.captures(page_xml) {
                found = Some(split_lines(&decode_xml_entities(&text[1])));
            }
            false
        })
        .map_err(|e| Error::io(&self.path, e))?;

        debug!("Scanned {} pages for {}", scanned, title);
        Ok(found)
    }
}
