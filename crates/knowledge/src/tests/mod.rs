//! Scenario tests across ingestion, retrieval and auditing.


use crate::config::{ChunkingConfig, KnowledgeConfig};
use crate::embeddings::providers::TrigramProvider;
use crate::KnowledgeBase;

/// A short drug leaflet, one fact per sentence.
pub(crate) const LEAFLET: &str = "Parasetamol ateş düşürücü ve ağrı kesici bir ilaçtır. \
    Yetişkinlerde günlük maksimum doz 4 gramdır. \
    Karaciğer yetmezliği olan hastalarda doz azaltılmalıdır. \
    Alkol kullanan hastalarda karaciğer hasarı riski artar. \
    Ayrıca ibuprofen mide kanaması riskini artırabilir. \
    Böbrek hastalarında ibuprofen dikkatli kullanılmalıdır. \
    Çocuklarda doz vücut ağırlığına göre hesaplanır.";

pub(crate) const DIMENSIONS: usize = 128;

/// Small windows so the leaflet spans several chunks.
pub(crate) fn leaflet_config() -> KnowledgeConfig {
    let mut config = KnowledgeConfig {
        chunking: ChunkingConfig {
            size: 120,
            overlap: 20,
        },
        ..Default::default()
    };
    config.embedding.dimensions = DIMENSIONS;
    config
}

pub(crate) fn embedder() -> TrigramProvider {
    TrigramProvider::new(DIMENSIONS)
}

pub(crate) async fn ingested_base() -> KnowledgeBase {
    let kb = KnowledgeBase::new(leaflet_config()).unwrap();
    kb.ingest("leaflet.txt", LEAFLET, Some(&embedder()))
        .await
        .unwrap();
    kb
}
