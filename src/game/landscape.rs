// The course: ten tiles of hills and thermal triggers downwind of the start

use glam::Vec3;
use rand::Rng;

use super::camera_man::CameraTarget;
use super::hill::{Face, Hill, Orientation};
use super::sky::{Sky, GLIDE_RANGE};
use super::thermal::ThermalTrigger;
use crate::core::color::Color;
use crate::core::math::rnd;
use crate::engine::scene::{Layer, Object3d, WireStyle};

pub const TILE_WIDTH: f32 = 20.0;
pub const MAX_TILES: usize = 10;

/// Goal line, at the end of the last tile
pub const GOAL_Y: f32 = TILE_WIDTH * MAX_TILES as f32;

const TILE: i32 = TILE_WIDTH as i32;

/// Road segment length
const ROAD_STEP: usize = 2;

const ROAD_COLOR: Color = Color::gray(220);
const GOAL_COLOR: Color = Color::rgb(220, 220, 100);

/// What is laid out on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// A hexagon of triggers on the course and two off it
    FlatLand,
    Hill1,
    Hill2,
    /// One trigger with a short cycle and long lived clouds
    Storm,
    Mountain1,
    /// A single slow trigger
    BlueHole,
    Mountain2,
    /// Two triggers before the goal and one beyond it
    Final,
}

impl TileKind {
    pub fn for_index(index: usize) -> Self {
        match index {
            2 => TileKind::Hill2,
            3 => TileKind::Storm,
            4 => TileKind::Hill1,
            6 => TileKind::Mountain1,
            7 => TileKind::BlueHole,
            8 => TileKind::Mountain2,
            i if i == MAX_TILES - 1 => TileKind::Final,
            _ => TileKind::FlatLand,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Tile {
    loaded: bool,
    hills: Vec<Hill>,
    triggers: Vec<ThermalTrigger>,
}

/// Tiles are loaded just ahead of the watched glider and dropped behind it
#[derive(Debug, Clone)]
pub struct Landscape {
    tiles: Vec<Tile>,
    current: usize,
    road: Object3d,
    goal_line: Object3d,
}

impl Landscape {
    pub fn new<R: Rng + ?Sized>(sky: &mut Sky, rng: &mut R) -> Self {
        let mut landscape = Self {
            tiles: vec![Tile::default(); MAX_TILES],
            current: 0,
            road: road(),
            goal_line: goal_line(),
        };
        landscape.load_tile(0, sky, rng);
        landscape
    }

    #[cfg(test)]
    pub fn current_tile(&self) -> usize {
        self.current
    }

    #[cfg(test)]
    pub fn is_loaded(&self, index: usize) -> bool {
        self.tiles.get(index).is_some_and(|t| t.loaded)
    }

    /// Index of the tile under p; points behind the start map to tile 0
    pub fn tile_index(&self, p: Vec3) -> usize {
        (0..MAX_TILES)
            .find(|&i| (i + 1) as f32 * TILE_WIDTH > p.y)
            .unwrap_or(MAX_TILES - 1)
    }

    /// Load the tile under p and the next one downwind; drop the one upwind
    pub fn load_tiles_around<R: Rng + ?Sized>(&mut self, p: Vec3, sky: &mut Sky, rng: &mut R) {
        self.current = self.tile_index(p);
        self.load_tile(self.current, sky, rng);
        if self.current + 1 < MAX_TILES {
            self.load_tile(self.current + 1, sky, rng);
        }
        if self.current > 0 {
            self.remove_tile(self.current - 1, false, sky);
        }
    }

    /// Drop every tile and clear the sky of their clouds
    pub fn remove_all(&mut self, sky: &mut Sky) {
        for i in 0..MAX_TILES {
            self.remove_tile(i, true, sky);
        }
    }

    fn load_tile<R: Rng + ?Sized>(&mut self, index: usize, sky: &mut Sky, rng: &mut R) {
        if self.tiles[index].loaded {
            return;
        }

        let kind = TileKind::for_index(index);
        let y0 = index as i32 * TILE;
        let mut tile = Tile {
            loaded: true,
            ..Tile::default()
        };
        let mut trigger = |x: i32, y: i32, strength: i32, cycle: f32, duration: f32| {
            ThermalTrigger::new(x, y, strength, cycle, duration, sky, rng)
        };

        match kind {
            TileKind::FlatLand => {
                // bruce's hexagon
                tile.triggers = vec![
                    trigger(0, y0 + 3, 2, 1.0, 1.0),
                    trigger(0, y0 + 15, 1, 1.0, 0.5),
                    trigger(5, y0 + 5, 1, 1.0, 1.0),
                    trigger(5, y0 + 13, 2, 0.5, 0.5),
                    trigger(-5, y0 + 5, 1, 1.0, 1.0),
                    trigger(-5, y0 + 13, 1, 1.0, 1.0),
                ];
            }
            TileKind::Hill1 => {
                tile.hills = vec![
                    Hill::new(2, y0 + TILE / 4, Orientation::X, 2, 0.3, 0.5, Face::Curvy),
                    Hill::new(-TILE / 2 - 4, y0 + TILE * 3 / 4 + 3, Orientation::Y, 6, 1.0, 1.0, Face::Spiky),
                    Hill::new(TILE / 2 + 6, y0 + TILE * 3 / 4, Orientation::Y, 3, 0.0, 0.5, Face::Spiky),
                ];
                tile.triggers = vec![trigger(0, y0 + 15, 1, 1.0, 0.5), trigger(5, y0 + 5, 1, 0.1, 0.1)];
            }
            TileKind::Hill2 => {
                tile.hills = vec![
                    Hill::new(-TILE / 4, y0 + TILE / 2, Orientation::X, 4, 2.0, 1.0, Face::Curvy),
                    Hill::new(TILE / 2 + 4, y0 + TILE * 3 / 4 + 3, Orientation::Y, 6, 1.0, 1.0, Face::Spiky),
                    Hill::new(-TILE / 2 - 6, y0 + TILE * 3 / 4 - 3, Orientation::Y, 3, 0.0, 0.5, Face::Spiky),
                ];
                tile.triggers = vec![trigger(0, y0 + 10, 1, 0.2, 0.1), trigger(-4, y0 + 10, 1, 0.2, 0.1)];
            }
            TileKind::Storm => {
                tile.triggers = vec![trigger(-4, y0 + TILE / 4, 2, 0.3, 3.0)];
            }
            TileKind::Mountain1 => {
                tile.hills = vec![
                    Hill::new(2, y0 + TILE / 2, Orientation::X, 3, 3.0, 1.1, Face::Curvy),
                    Hill::new(-TILE / 2, y0, Orientation::Y, 6, 1.0, 1.0, Face::Spiky),
                    Hill::new(TILE / 2 + 6, y0 + TILE * 3 / 4, Orientation::Y, 3, 0.0, 0.5, Face::Spiky),
                ];
                tile.triggers = vec![trigger(0, y0 + 15, 1, 1.0, 0.5), trigger(4, y0 + 10, 1, 0.1, 0.1)];
            }
            TileKind::BlueHole => {
                tile.triggers = vec![trigger(0, y0 + TILE / 2, 1, 2.0, 1.0)];
            }
            TileKind::Mountain2 => {
                tile.hills = vec![
                    Hill::new(-7, y0 + TILE / 2, Orientation::X, 4, 2.0, 1.5, Face::Curvy),
                    Hill::new(-TILE / 2, y0 + TILE * 3 / 4, Orientation::Y, 4, 1.0, 1.0, Face::Spiky),
                    Hill::new(TILE / 2 + 2, y0, Orientation::Y, 3, 0.0, 0.5, Face::Spiky),
                ];
                tile.triggers = vec![trigger(-6, y0 + 10, 1, 0.2, 0.1), trigger(-2, y0 + 10, 1, 0.2, 0.1)];
            }
            TileKind::Final => {
                tile.triggers = vec![
                    trigger(0, y0 + 3, 2, 1.0, 1.0),
                    trigger(0, y0 + 15, 2, 1.0, 1.0),
                    trigger(0, y0 + TILE + 2, 1, 0.2, 0.5),
                ];
            }
        }

        if matches!(kind, TileKind::FlatLand | TileKind::Hill1 | TileKind::Hill2 | TileKind::Mountain1) {
            // off-course clouds, for looks
            let x0 = rnd(rng, 2.0, -2.0) as i32;
            let dx = TILE / 2 + 3;
            tile.triggers.push(ThermalTrigger::new(x0 - dx, y0 + 3, 2, 1.0, 1.0, sky, rng));
            tile.triggers.push(ThermalTrigger::new(x0 + dx, y0 + 15, 2, 1.0, 1.0, sky, rng));
        }

        log::debug!(
            "Loaded tile {} ({:?}): {} hills, {} triggers",
            index,
            kind,
            tile.hills.len(),
            tile.triggers.len()
        );
        self.tiles[index] = tile;
    }

    fn remove_tile(&mut self, index: usize, really: bool, sky: &mut Sky) {
        let tile = &mut self.tiles[index];
        if !tile.loaded {
            return;
        }
        for trigger in &tile.triggers {
            trigger.retire(really, sky);
        }
        *tile = Tile::default();
        log::debug!("Removed tile {}", index);
    }

    /// Run every loaded trigger for `dt` model minutes
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, sky: &mut Sky, rng: &mut R) {
        for trigger in self.tiles.iter_mut().flat_map(|t| t.triggers.iter_mut()) {
            trigger.update(dt, sky, rng);
        }
    }

    pub fn reached_goal(&self, p: Vec3) -> bool {
        p.y >= GOAL_Y
    }

    #[cfg(test)]
    pub fn hills(&self) -> impl Iterator<Item = &Hill> {
        self.tiles.iter().flat_map(|t| t.hills.iter())
    }

    #[cfg(test)]
    pub fn triggers(&self) -> impl Iterator<Item = &ThermalTrigger> {
        self.tiles.iter().flat_map(|t| t.triggers.iter())
    }

    /// Hill under p, if its tile is loaded
    pub fn hill_at(&self, p: Vec3) -> Option<&Hill> {
        let tile = &self.tiles[self.tile_index(p)];
        if !tile.loaded {
            return None;
        }
        tile.hills.iter().find(|h| h.contains(p.x, p.y))
    }

    /// Ground height; flat away from hills
    pub fn height(&self, x: f32, y: f32) -> f32 {
        self.hill_at(Vec3::new(x, y, 0.0))
            .map_or(0.0, |h| h.height(x, y))
    }

    /// First foreground hill downwind of p within glide range, in this or the next tile
    pub fn next_hill(&self, p: Vec3) -> Option<&Hill> {
        let range = GLIDE_RANGE * p.z;
        let index = self.tile_index(p);

        for tile in self.tiles[index..].iter().take(2) {
            if !tile.loaded {
                return None;
            }
            let ahead = tile.hills.iter().find(|h| {
                let y0 = h.origin().y;
                y0 >= p.y && y0 - p.y < range && h.in_foreground()
            });
            if ahead.is_some() {
                return ahead;
            }
        }
        None
    }

    /// Everything to draw: road, goal line, hills and trigger markers
    pub fn objects(&self) -> impl Iterator<Item = &Object3d> {
        let tiles = self.tiles.iter().flat_map(|t| {
            t.hills
                .iter()
                .map(|h| h.object())
                .chain(t.triggers.iter().map(|tr| tr.cross_hair()))
        });
        [&self.road, &self.goal_line].into_iter().chain(tiles)
    }
}

impl CameraTarget for Landscape {
    fn eye(&self) -> Vec3 {
        let y = self.current as f32 * TILE_WIDTH + TILE_WIDTH / 2.0;
        Vec3::new(TILE_WIDTH / 2.0, y - TILE_WIDTH / 2.0, 2.0)
    }

    fn focus(&self) -> Vec3 {
        let y = self.current as f32 * TILE_WIDTH + TILE_WIDTH / 2.0;
        Vec3::new(0.0, y, 0.0)
    }
}

/// A road meandering down the course
fn road() -> Object3d {
    let mut o = Object3d::new(Layer::Background);
    let length = MAX_TILES * TILE as usize;
    let x = |i: usize| (i as f32 * std::f32::consts::PI / TILE_WIDTH).sin();

    for i in (0..length).step_by(ROAD_STEP) {
        let j = i + ROAD_STEP;
        o.add_wire(
            &[Vec3::new(x(i), i as f32, 0.0), Vec3::new(x(j), j as f32, 0.0)],
            ROAD_COLOR,
            WireStyle::LINE,
        );
    }
    o
}

/// Start and finish lines
fn goal_line() -> Object3d {
    let mut o = Object3d::new(Layer::Background);
    let half = TILE_WIDTH / 8.0;
    for y in [GOAL_Y, 0.0] {
        o.add_wire(&[Vec3::new(-half, y, 0.0), Vec3::new(half, y, 0.0)], GOAL_COLOR, WireStyle::LINE);
    }
    o
}
