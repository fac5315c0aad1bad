//! Command handlers.
//!
//! Handlers write their report to the given writer so they can be driven
//! from tests as well as from `main`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use tracing::info;
use ztl_core::{
    active_zone_statuses, city_status, close_ring, find_source, parse_coordinates, registry,
    source_keys, City, CitySource, CoordinateFormat,
};
use ztl_storage::{CityStore, StorageError};

/// Builds the requested built-in cities (all of them when none are named)
/// and saves them. Returns the written paths.
pub fn import(store: &CityStore, cities: &[String]) -> Result<Vec<PathBuf>> {
    let sources: Vec<&dyn CitySource> = if cities.is_empty() {
        registry().to_vec()
    } else {
        cities
            .iter()
            .map(|name| resolve_source(name))
            .collect::<Result<_>>()?
    };

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let city = source.build();
        let path = store
            .save_city(&city)
            .with_context(|| format!("Failed to save {}", city.name))?;
        info!("Imported {} ({} zones)", city.name, city.zones().len());
        written.push(path);
    }
    Ok(written)
}

/// Lists stored cities with their zone and restriction counts.
pub fn list_cities(store: &CityStore, out: &mut impl Write) -> Result<()> {
    let cities = store.load_all().context("Failed to read data directory")?;
    if cities.is_empty() {
        writeln!(
            out,
            "No cities stored in {}. Run `ztl import` first.",
            store.data_dir().display()
        )?;
        return Ok(());
    }

    for city in &cities {
        writeln!(
            out,
            "{} ({}): {} zones, {} restrictions",
            city.name,
            city.country,
            city.zones().len(),
            city.restriction_count()
        )?;
    }
    Ok(())
}

/// Reports every zone of a city with its active flag.
pub fn status(
    store: &CityStore,
    city_name: &str,
    instant: &NaiveDateTime,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let city = load_city(store, city_name)?;
    let status = city_status(&city, instant);

    if json {
        serde_json::to_writer_pretty(&mut *out, &status)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} at {}: {} of {} zones active",
        status.name,
        instant.format("%Y-%m-%d %H:%M"),
        status.active_count(),
        status.zones.len()
    )?;
    for zone in &status.zones {
        let flag = if zone.is_active { "ACTIVE" } else { "free" };
        writeln!(out, "  [{flag:>6}] {} ({})", zone.name, zone.id)?;
    }
    Ok(())
}

/// Reports only the zones active at the instant.
pub fn active(
    store: &CityStore,
    city_name: &str,
    instant: &NaiveDateTime,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let city = load_city(store, city_name)?;
    let zones = active_zone_statuses(&city, instant);

    if json {
        serde_json::to_writer_pretty(&mut *out, &zones)?;
        writeln!(out)?;
        return Ok(());
    }

    if zones.is_empty() {
        writeln!(out, "No active zones in {}", city.name)?;
    }
    for zone in &zones {
        writeln!(out, "{} ({})", zone.name, zone.id)?;
    }
    Ok(())
}

/// Writes a city's FeatureCollection to `output`, or to `out` when no file
/// is given.
pub fn geojson(
    store: &CityStore,
    city_name: &str,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let city = load_city(store, city_name)?;
    let collection = city.to_feature_collection();

    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&collection)?;
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote GeoJSON for {} to {:?}", city.name, path);
        }
        None => {
            serde_json::to_writer_pretty(&mut *out, &collection)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Replaces a zone's outline with coordinates read from a file.
pub fn set_boundaries(
    store: &CityStore,
    city_name: &str,
    zone_id: &str,
    file: &Path,
    format: CoordinateFormat,
) -> Result<usize> {
    let mut city = load_city(store, city_name)?;
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let points = parse_coordinates(&text, format)
        .with_context(|| format!("Failed to parse coordinates in {}", file.display()))?;
    if points.is_empty() {
        bail!("No coordinates found in {}", file.display());
    }

    let city_display = city.name.clone();
    let zone = city
        .zone_mut(zone_id)
        .ok_or_else(|| anyhow!("Unknown zone '{}' in {}", zone_id, city_display))?;
    zone.boundaries = close_ring(points);
    let count = zone.boundaries.len();

    store.save_city(&city)?;
    info!("Set {} boundary points on {}", count, zone_id);
    Ok(count)
}

fn resolve_source(name: &str) -> Result<&'static dyn CitySource> {
    find_source(name).ok_or_else(|| {
        anyhow!(
            "Unknown city '{}'. Available: {}",
            name,
            source_keys().join(", ")
        )
    })
}

/// Loads a stored city by name, also accepting registry aliases such as
/// "turin" for the stored "Torino".
fn load_city(store: &CityStore, name: &str) -> Result<City> {
    match store.load_city(name) {
        Ok(city) => Ok(city),
        Err(StorageError::NotFound(_)) => match find_source(name) {
            Some(source) if source.display_name().to_lowercase() != name.trim().to_lowercase() => {
                load_city(store, source.display_name())
            }
            Some(_) => bail!("City '{}' has not been imported. Run `ztl import {}`", name, name),
            None => bail!(
                "Unknown city '{}'. Available: {}",
                name,
                source_keys().join(", ")
            ),
        },
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", name)),
    }
}
