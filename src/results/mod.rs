// Search results in display order
// Built once from a search response, handed to the picker, then thrown away

use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Track,
    Artist,
    Album,
}

impl ResultKind {
    /// Value for the search endpoint's `type` parameter
    pub fn api_type(&self) -> &'static str {
        match self {
            ResultKind::Track => "track",
            ResultKind::Artist => "artist",
            ResultKind::Album => "album",
        }
    }

    /// Key of the paging object in a search response
    pub fn collection_key(&self) -> &'static str {
        match self {
            ResultKind::Track => "tracks",
            ResultKind::Artist => "artists",
            ResultKind::Album => "albums",
        }
    }

    /// Number of display fields every entry of this kind carries
    pub fn arity(&self) -> usize {
        match self {
            ResultKind::Track => 3,
            ResultKind::Artist => 1,
            ResultKind::Album => 2,
        }
    }
}

/// Raw catalog record as the search endpoint returns it (only the bits we show)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogItem {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<NamedRef>,
    #[serde(default)]
    pub album: Option<NamedRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl CatalogItem {
    fn first_artist(&self) -> String {
        self.artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn album_name(&self) -> String {
        self.album
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn project(&self, kind: ResultKind) -> Vec<String> {
        match kind {
            ResultKind::Track => vec![self.name.clone(), self.first_artist(), self.album_name()],
            ResultKind::Artist => vec![self.name.clone()],
            ResultKind::Album => vec![self.name.clone(), self.first_artist()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub identifier: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResultModel {
    kind: ResultKind,
    entries: Vec<ResultEntry>,
}

impl ResultModel {
    /// Project raw records into display entries, keeping relevance order.
    ///
    /// A repeated identifier keeps the position of its first occurrence. An empty
    /// input gives an empty model, which callers report as "no results".
    pub fn build(raw: &[CatalogItem], kind: ResultKind) -> Self {
        let mut seen = HashSet::with_capacity(raw.len());
        let mut entries = Vec::with_capacity(raw.len());

        for item in raw {
            if !seen.insert(item.uri.as_str()) {
                debug!("Dropping duplicate search result {}", item.uri);
                continue;
            }
            entries.push(ResultEntry {
                identifier: item.uri.clone(),
                fields: item.project(kind),
            });
        }

        Self { kind, entries }
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Panics on an out-of-range index; the picker never produces one
    pub fn get(&self, index: usize) -> &ResultEntry {
        &self.entries[index]
    }

    pub fn identifier_at(&self, index: usize) -> &str {
        &self.entries[index].identifier
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }
}
