use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::layout::{
    engine::{LayoutEngine, PageRequest},
    model::PageLayout,
};

/// Layouts of one book keyed by page number.
///
/// Regenerating a page replaces its previous layout.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BookLayouts {
    pages: BTreeMap<u32, PageLayout>,
}

impl BookLayouts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a layout, returning the one it replaced.
    pub fn insert(&mut self, page_number: u32, layout: PageLayout) -> Option<PageLayout> {
        self.pages.insert(page_number, layout)
    }

    pub fn get(&self, page_number: u32) -> Option<&PageLayout> {
        self.pages.get(&page_number)
    }

    pub fn remove(&mut self, page_number: u32) -> Option<PageLayout> {
        self.pages.remove(&page_number)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in ascending page-number order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &PageLayout)> {
        self.pages.iter().map(|(k, v)| (*k, v))
    }

    /// Generate (or regenerate) one page and store it.
    pub fn regenerate(&mut self, engine: &LayoutEngine, req: &PageRequest) -> &PageLayout {
        let layout = engine.generate(req);
        self.pages.insert(req.page_number, layout);
        &self.pages[&req.page_number]
    }

    /// Lay out every request in parallel.
    ///
    /// Pages are independent, so the result matches a sequential run. When two requests share
    /// a page number the later one wins.
    #[tracing::instrument(skip(engine, requests), fields(pages = requests.len()))]
    pub fn generate_all(engine: &LayoutEngine, requests: &[PageRequest]) -> Self {
        let layouts: Vec<PageLayout> = requests.par_iter().map(|r| engine.generate(r)).collect();

        let mut book = Self::new();
        for (req, layout) in requests.iter().zip(layouts) {
            if book.insert(req.page_number, layout).is_some() {
                tracing::debug!(page = req.page_number, "duplicate page request replaced");
            }
        }
        book
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/book.rs"]
mod tests;
