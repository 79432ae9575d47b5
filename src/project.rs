//! Project manifests: the TOML description a game is packed from.
//!
//! Mirrors what the map editor keeps per project (project info, the
//! tile-attribute checkboxes, the map list) and knows how to encode each
//! piece into the resource formats the engine reads.
//!
//! ```toml
//! [project]
//! name = "My Puzzle Pack"
//!
//! [[tiles]]
//! index = 2
//! player_start = true
//!
//! [[maps]]
//! id = 1
//! name = "First Steps"
//! rows = [[2, 1, 3]]
//! ```

use crate::attrs::TileAttr;
use crate::map::MAP_NAME_LEN;
use log::warn;
use serde::Deserialize;

/// Tool name written into `project.inf` alongside the tool version and
/// the project's display name.
const APP_NAME: &str = "boxcart";

#[derive(Debug, Deserialize)]
pub struct Project {
    pub project: ProjectInfo,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
    pub maps: Vec<MapDef>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

/// One tile type's behavior flags, keyed by 1-based tile index.
#[derive(Debug, Deserialize)]
pub struct TileDef {
    pub index: u8,
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub player_start: bool,
    #[serde(default)]
    pub player_end: bool,
    #[serde(default)]
    pub pushable: bool,
}

impl TileDef {
    fn attr(&self) -> TileAttr {
        let mut attr = TileAttr::NONE;
        if self.solid {
            attr = attr | TileAttr::SOLID;
        }
        if self.player_start {
            attr = attr | TileAttr::PLAYER_START;
        }
        if self.player_end {
            attr = attr | TileAttr::PLAYER_END;
        }
        if self.pushable {
            attr = attr | TileAttr::PUSHABLE;
        }
        attr
    }
}

#[derive(Debug, Deserialize)]
pub struct MapDef {
    pub id: u16,
    pub name: String,
    /// Row-major tile indexes; all rows must be the same length.
    pub rows: Vec<Vec<u8>>,
}

impl Project {
    /// Parse and validate a manifest.
    pub fn from_toml_str(text: &str) -> Result<Project, String> {
        let project: Project =
            toml::from_str(text).map_err(|e| format!("manifest parse error: {}", e))?;
        project.validate()?;
        Ok(project)
    }

    fn validate(&self) -> Result<(), String> {
        if self.maps.is_empty() {
            return Err("manifest defines no maps".to_string());
        }
        let slots = self.tiles.iter().map(|t| t.index).max().unwrap_or(0);
        for map in &self.maps {
            if map.id == 0 {
                return Err(format!("map \"{}\" has id 0; ids start at 1", map.name));
            }
            if self.maps.iter().filter(|m| m.id == map.id).count() > 1 {
                return Err(format!("duplicate map id {}", map.id));
            }
            let width = map.rows.first().map(|row| row.len()).unwrap_or(0);
            if width == 0 {
                return Err(format!("map \"{}\" has no cells", map.name));
            }
            if map.rows.iter().any(|row| row.len() != width) {
                return Err(format!("map \"{}\" has ragged rows", map.name));
            }
            if map.rows.len() > u8::MAX as usize || width > u8::MAX as usize {
                return Err(format!("map \"{}\" dimensions exceed a byte", map.name));
            }
            // The engine trusts packed archives; tile indexes past the
            // attribute table must be caught here, not at play time.
            if slots > 0 {
                for &tile in map.rows.iter().flatten() {
                    let slot = if tile == 0 { 1 } else { tile };
                    if slot > slots {
                        return Err(format!(
                            "map \"{}\" uses tile {} but tile attributes stop at {}",
                            map.name, tile, slots
                        ));
                    }
                }
            }
        }
        for tile in &self.tiles {
            if tile.index == 0 {
                return Err("tile index 0 is reserved for the background alias".to_string());
            }
        }
        Ok(())
    }

    /// Encode the `main.atr` payload: one u16-LE mask per tile slot, sized
    /// to the highest index mentioned.
    pub fn attr_table_bytes(&self) -> Vec<u8> {
        let slots = self.tiles.iter().map(|t| t.index as usize).max().unwrap_or(0);
        let mut masks = vec![0u16; slots];
        for tile in &self.tiles {
            masks[tile.index as usize - 1] = tile.attr().0;
        }
        masks.iter().flat_map(|m| m.to_le_bytes()).collect()
    }

    /// Encode the `project.inf` payload: tool name, tool version and
    /// project name as consecutive NUL-terminated strings.
    pub fn inf_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for field in [APP_NAME, env!("CARGO_PKG_VERSION"), &self.project.name] {
            bytes.extend_from_slice(field.as_bytes());
            bytes.push(0);
        }
        bytes
    }

    /// Encode one map's `levelNNN.map` payload.
    pub fn map_record_bytes(map: &MapDef) -> Vec<u8> {
        let width = map.rows[0].len() as u16;
        let height = map.rows.len() as u16;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&map.id.to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        let mut padded = [0u8; MAP_NAME_LEN];
        let name = map.name.as_bytes();
        if name.len() > MAP_NAME_LEN {
            warn!(
                "map name \"{}\" truncated to {} bytes",
                map.name, MAP_NAME_LEN
            );
        }
        let visible = name.len().min(MAP_NAME_LEN);
        padded[..visible].copy_from_slice(&name[..visible]);
        bytes.extend_from_slice(&padded);
        for row in &map.rows {
            bytes.extend_from_slice(row);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::AttrTable;
    use crate::map::MapRecord;

    const MANIFEST: &str = r#"
        [project]
        name = "Test Pack"

        [[tiles]]
        index = 2
        player_start = true

        [[tiles]]
        index = 4
        solid = true

        [[maps]]
        id = 1
        name = "First"
        rows = [[2, 1, 4], [1, 1, 4]]
    "#;

    #[test]
    fn manifest_round_trips_through_the_engine_formats() {
        let project = Project::from_toml_str(MANIFEST).unwrap();

        let attrs = AttrTable::parse(&project.attr_table_bytes());
        assert_eq!(attrs.len(), 4);
        assert!(attrs.attr_of(2).is_player_start());
        assert!(attrs.attr_of(4).is_solid());
        assert_eq!(attrs.attr_of(1), TileAttr::NONE);

        let map = MapRecord::parse(&Project::map_record_bytes(&project.maps[0])).unwrap();
        assert_eq!(map.id, 1);
        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!(map.name, "First");
        assert_eq!(map.tiles, [2, 1, 4, 1, 1, 4]);

        let (app, _version, name) = crate::util::inf_strings(&project.inf_bytes()).unwrap();
        assert_eq!(app, "boxcart");
        assert_eq!(name, "Test Pack");
    }

    #[test]
    fn validation_rejects_broken_maps() {
        let ragged = MANIFEST.replace("[[2, 1, 4], [1, 1, 4]]", "[[2, 1], [1, 1, 4]]");
        assert!(Project::from_toml_str(&ragged).is_err());

        let zero_id = MANIFEST.replace("id = 1", "id = 0");
        assert!(Project::from_toml_str(&zero_id).is_err());

        // Tile 9 has no attribute slot; the engine would fault on it.
        let unknown_tile = MANIFEST.replace("rows = [[2, 1, 4], [1, 1, 4]]", "rows = [[2, 9, 4]]");
        assert!(Project::from_toml_str(&unknown_tile).is_err());

        let no_maps = r#"
            [project]
            name = "Empty"
            maps = []
        "#;
        assert!(Project::from_toml_str(no_maps).is_err());
    }
}
