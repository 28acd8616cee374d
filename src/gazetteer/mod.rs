//! Geographic reference data for ontology population.
//!
//! A [`GazetteerClient`] talks to the remote service; [`Gazetteer`] applies
//! the filtering and matching rules on top of it and writes audit listings.
//! Results are plain `place id -> name` maps that [`import_places`] turns
//! into ontology individuals.

use std::{
    collections::BTreeMap,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    ontology::{Iri, OntologyStore},
    Error, Result,
};

pub mod geonames;

pub use geonames::GeoNamesClient;

/// Identifier-to-name map returned by gazetteer lookups.
pub type PlaceMap = BTreeMap<u64, String>;

/// Place entry as returned by the gazetteer service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub geoname_id: u64,
    pub name: String,
    /// Feature code, e.g. `ADM1` for first level administrative divisions.
    #[serde(default)]
    pub fcode: Option<String>,
    #[serde(default)]
    pub admin_name1: Option<String>,
}

/// Errors surfaced by gazetteer adapters.
#[derive(Debug, Error)]
pub enum GazetteerError {
    /// The adapter could not be built from the supplied settings.
    #[error("invalid gazetteer configuration: {0}")]
    InvalidConfiguration(String),
    /// The HTTP exchange failed.
    #[error("gazetteer request failed: {0}")]
    Request(String),
    /// The service answered with an error status.
    #[error("gazetteer service error {code}: {message}")]
    Service { code: i64, message: String },
    /// The response body could not be decoded.
    #[error("failed to decode gazetteer response: {0}")]
    Decode(String),
}

/// Contract implemented by gazetteer backends.
#[async_trait]
pub trait GazetteerClient: Send + Sync {
    /// Direct children of a place.
    async fn children(&self, parent_id: u64) -> Result<Vec<PlaceRecord>, GazetteerError>;

    /// Populated places named like `city` within the first level division
    /// `state` of the configured country.
    async fn search_places(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Vec<PlaceRecord>, GazetteerError>;
}

/// Applies the administrative-level and name matching rules over a client.
pub struct Gazetteer<C> {
    client: C,
}

impl<C: GazetteerClient> Gazetteer<C> {
    /// Wraps a client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Children of `parent_id` whose feature code is `ADM{level}`.
    ///
    /// Also writes a `name | IRI` listing into `out_dir` (see
    /// [`listing_path`]).
    pub async fn admin_divisions(
        &self,
        parent_id: u64,
        level: u8,
        out_dir: &Path,
    ) -> Result<PlaceMap> {
        let wanted = format!("ADM{level}");
        let divisions: PlaceMap = self
            .client
            .children(parent_id)
            .await?
            .into_iter()
            .filter(|place| place.fcode.as_deref() == Some(wanted.as_str()))
            .map(|place| (place.geoname_id, place.name))
            .collect();

        let path = listing_path(out_dir, parent_id, level);
        write_listing(&path, &divisions)?;
        info!(
            parent_id,
            level,
            count = divisions.len(),
            path = %path.display(),
            "admin_divisions_fetched"
        );
        Ok(divisions)
    }

    /// Resolves `"City, State"` entries to place identifiers.
    ///
    /// Entries that are not exactly two comma separated parts, and cities
    /// without a case-insensitive name match, are left out.
    pub async fn city_ids<I, S>(&self, pairs: I) -> Result<PlaceMap>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut found = PlaceMap::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((city, state)) = split_city_state(pair) else {
                warn!(entry = pair, "city_state_pair_skipped");
                continue;
            };
            let wanted = city.to_lowercase();
            let hit = self
                .client
                .search_places(city, state)
                .await?
                .into_iter()
                .find(|place| place.name.to_lowercase() == wanted);
            match hit {
                Some(place) => {
                    found.insert(place.geoname_id, place.name);
                }
                None => warn!(city, state, "city_not_matched"),
            }
        }
        info!(count = found.len(), "city_ids_resolved");
        Ok(found)
    }
}

fn split_city_state(pair: &str) -> Option<(&str, &str)> {
    let mut parts = pair.split(", ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(city), Some(state), None) => Some((city.trim(), state.trim())),
        _ => None,
    }
}

/// Machine resolvable IRI of a place.
#[must_use]
pub fn geo_iri(id: u64) -> Iri {
    NamedNode::new_unchecked(format!("http://sws.geonames.org/{id}/")).into()
}

/// Human browsable IRI of a place.
#[must_use]
pub fn geo_iri_alt(id: u64) -> Iri {
    NamedNode::new_unchecked(format!("https://www.geonames.org/{id}/")).into()
}

/// Location of the audit listing written by [`Gazetteer::admin_divisions`].
#[must_use]
pub fn listing_path(out_dir: &Path, parent_id: u64, level: u8) -> PathBuf {
    out_dir.join(format!("{parent_id}-{level}_level_admin_divisions.txt"))
}

fn write_listing(path: &Path, places: &PlaceMap) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;
    }
    let file = fs::File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = BufWriter::new(file);
    for (id, name) in places {
        writeln!(writer, "{name} | {}", geo_iri(*id)).map_err(|err| Error::io(path, err))?;
    }
    writer.flush().map_err(|err| Error::io(path, err))
}

/// Persists a lookup table as JSON.
pub fn write_lookup(path: &Path, places: &PlaceMap) -> Result<()> {
    let file = fs::File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, places).map_err(|source| Error::Lookup {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|err| Error::io(path, err))
}

/// Reads a lookup table written by [`write_lookup`].
pub fn read_lookup(path: &Path) -> Result<PlaceMap> {
    let content = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    serde_json::from_str(&content).map_err(|source| Error::Lookup {
        path: path.to_path_buf(),
        source,
    })
}

/// Declares each place as a labelled individual under its [`geo_iri`],
/// optionally typed with `class`.
pub fn import_places(
    store: &mut OntologyStore,
    places: &PlaceMap,
    class: Option<&Iri>,
) -> Result<Vec<Iri>> {
    if let Some(class) = class {
        if !store.is_class(class) {
            return Err(Error::missing_class("import_places", class));
        }
    }
    let mut imported = Vec::with_capacity(places.len());
    for (id, name) in places {
        let iri = geo_iri(*id);
        store.individuals_builder().add_individual_with_iri(&iri, name);
        if let Some(class) = class {
            store.taxonomy().set_type(&iri, class)?;
        }
        imported.push(iri);
    }
    info!(count = imported.len(), "places_imported");
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;

    use super::{geo_iri, geo_iri_alt, listing_path, split_city_state, PlaceRecord};

    #[rstest]
    #[case("Pune, Maharashtra", Some(("Pune", "Maharashtra")))]
    #[case("Pune,Maharashtra", None)]
    #[case("Pune", None)]
    #[case("Navi Mumbai, Maharashtra, India", None)]
    fn city_state_pairs(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_city_state(input), expected);
    }

    #[test]
    fn place_iris_follow_templates() {
        assert_eq!(geo_iri(1269750).as_str(), "http://sws.geonames.org/1269750/");
        assert_eq!(geo_iri_alt(1269750).as_str(), "https://www.geonames.org/1269750/");
        assert_eq!(
            listing_path(Path::new("GeoNames_data"), 1269750, 1),
            Path::new("GeoNames_data/1269750-1_level_admin_divisions.txt")
        );
    }

    #[test]
    fn decodes_service_records() {
        let record: PlaceRecord = serde_json::from_str(
            r#"{"geonameId": 1264418, "name": "Maharashtra", "fcode": "ADM1", "adminName1": "Maharashtra", "lat": "19.5"}"#,
        )
        .expect("record");
        assert_eq!(record.geoname_id, 1264418);
        assert_eq!(record.fcode.as_deref(), Some("ADM1"));
    }
}
