//! Terrain grid and building placement.
//!
//! The game state only talks to the map through [`TerrainMap`]. [`GridMap`]
//! is the row-major implementation used by generated maps and tests.
//!
//! A field stores the [`BuildingId`] of its occupant, never the building
//! itself; the registry in the game state owns the instance.

use serde::{Deserialize, Serialize};

use crate::buildings::BuildingId;

/// Terrain of a single field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Terrain {
    /// Open flat land.
    #[default]
    Plains,
    /// Woodland.
    Forest,
    /// Rolling high ground.
    Hills,
    /// Lakes and rivers.
    Water,
    /// Arid land.
    Desert,
    /// Impassable peaks.
    Mountains,
}

impl Terrain {
    /// Every terrain type.
    pub const ALL: [Self; 6] = [
        Self::Plains,
        Self::Forest,
        Self::Hills,
        Self::Water,
        Self::Desert,
        Self::Mountains,
    ];
}

/// One cell of the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Terrain type.
    pub terrain: Terrain,
    /// Occupant, if any.
    pub building: Option<BuildingId>,
}

impl Field {
    /// Create an empty field.
    #[must_use]
    pub const fn new(x: u32, y: u32, terrain: Terrain) -> Self {
        Self {
            x,
            y,
            terrain,
            building: None,
        }
    }

    /// Check if nothing stands on this field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.building.is_none()
    }
}

/// Why a building could not be put on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Coordinates outside the grid.
    OutOfBounds,
    /// Field already holds a building.
    Occupied(BuildingId),
}

/// Map capability consumed by the game state.
pub trait TerrainMap: std::fmt::Debug {
    /// Grid width in fields.
    fn width(&self) -> u32;

    /// Grid height in fields.
    fn height(&self) -> u32;

    /// Field at (x, y), `None` if out of bounds.
    fn field(&self, x: u32, y: u32) -> Option<&Field>;

    /// All in-bounds fields around (x, y), excluding (x, y) itself.
    fn neighbors(&self, x: u32, y: u32) -> Vec<Field>;

    /// Mark (x, y) as holding `building`.
    fn add_building(&mut self, x: u32, y: u32, building: BuildingId)
        -> Result<(), PlacementError>;

    /// Clear (x, y), returning the former occupant.
    ///
    /// Must fully reverse [`TerrainMap::add_building`].
    fn remove_building(&mut self, x: u32, y: u32) -> Option<BuildingId>;

    /// Check if coordinates are within bounds.
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }
}

/// Row-major terrain grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    /// Grid width in fields.
    width: u32,
    /// Grid height in fields.
    height: u32,
    /// Field data stored in row-major order.
    fields: Vec<Field>,
}

impl GridMap {
    /// Create a map covered in a single terrain type.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        Self::from_fn(width, height, |_, _| terrain)
    }

    /// Create a map whose terrain is produced per coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut terrain: impl FnMut(u32, u32) -> Terrain) -> Self {
        assert!(width > 0, "GridMap width must be positive");
        assert!(height > 0, "GridMap height must be positive");

        let mut fields = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                fields.push(Field::new(x, y, terrain(x, y)));
            }
        }
        Self {
            width,
            height,
            fields,
        }
    }

    /// Convert (x, y) coordinates to grid index.
    #[inline]
    fn coords_to_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Overwrite the terrain of one field. Returns `false` if out of bounds.
    pub fn set_terrain(&mut self, x: u32, y: u32, terrain: Terrain) -> bool {
        if self.in_bounds(x, y) {
            let index = self.coords_to_index(x, y);
            self.fields[index].terrain = terrain;
            true
        } else {
            false
        }
    }

    /// Iterate over every field in row-major order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Count the fields of a terrain type.
    #[must_use]
    pub fn count_terrain(&self, terrain: Terrain) -> usize {
        self.fields.iter().filter(|f| f.terrain == terrain).count()
    }
}

impl TerrainMap for GridMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn field(&self, x: u32, y: u32) -> Option<&Field> {
        if self.in_bounds(x, y) {
            Some(&self.fields[self.coords_to_index(x, y)])
        } else {
            None
        }
    }

    fn neighbors(&self, x: u32, y: u32) -> Vec<Field> {
        let mut result = Vec::with_capacity(8);
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                let (Ok(nx), Ok(ny)) = (u32::try_from(nx), u32::try_from(ny)) else {
                    continue;
                };
                if let Some(field) = self.field(nx, ny) {
                    result.push(*field);
                }
            }
        }
        result
    }

    fn add_building(
        &mut self,
        x: u32,
        y: u32,
        building: BuildingId,
    ) -> Result<(), PlacementError> {
        if !self.in_bounds(x, y) {
            return Err(PlacementError::OutOfBounds);
        }
        let index = self.coords_to_index(x, y);
        let field = &mut self.fields[index];
        if let Some(existing) = field.building {
            return Err(PlacementError::Occupied(existing));
        }
        field.building = Some(building);
        Ok(())
    }

    fn remove_building(&mut self, x: u32, y: u32) -> Option<BuildingId> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let index = self.coords_to_index(x, y);
        self.fields[index].building.take()
    }
}
