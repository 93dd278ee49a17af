use bytes::Bytes;

/// Raw image bytes as uploaded, with their declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub data: Bytes,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct AnalyzeFoodInput {
    pub image: ImageInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMatch {
    pub video_id: String,
    pub thumbnail_url: Option<String>,
}

/// Outcome of the video enrichment fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub attempted: usize,
    pub enriched: usize,
    pub not_found: usize,
    pub failed: usize,
}
