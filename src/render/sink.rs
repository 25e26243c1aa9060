use crate::core::error::Result;
use crate::render::MapDocument;

/// Destination for a finished map
pub trait VisualizationSink {
    fn render(&mut self, document: &MapDocument) -> Result<()>;
}

/// Keeps rendered documents in memory; used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<MapDocument>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&MapDocument> {
        self.documents.last()
    }
}

impl VisualizationSink for MemorySink {
    fn render(&mut self, document: &MapDocument) -> Result<()> {
        self.documents.push(document.clone());
        Ok(())
    }
}

impl<S: VisualizationSink + ?Sized> VisualizationSink for &mut S {
    fn render(&mut self, document: &MapDocument) -> Result<()> {
        (**self).render(document)
    }
}
